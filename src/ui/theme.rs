use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    /// Averages at or above [`Theme::HIGH_SCORE`]
    pub score_high: Style,
    /// Averages below [`Theme::LOW_SCORE`]
    pub score_low: Style,
}

impl Theme {
    pub const HIGH_SCORE: f64 = 85.0;
    pub const LOW_SCORE: f64 = 65.0;

    /// Colors only when stdout is a terminal
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            score_high: Style::new().green(),
            score_low: Style::new().red(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            score_high: Style::new(),
            score_low: Style::new(),
        }
    }

    /// Style for an average score
    pub fn score(&self, value: f64) -> Style {
        if value >= Self::HIGH_SCORE {
            self.score_high.clone()
        } else if value < Self::LOW_SCORE {
            self.score_low.clone()
        } else {
            Style::new()
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
