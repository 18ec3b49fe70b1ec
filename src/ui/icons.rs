pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const SEED: &str = "🌱";
    pub const SCROLL: &str = "📜";
    pub const CAP: &str = "🎓";
    pub const BOOKS: &str = "📚";
    pub const TEACHER: &str = "🧑‍🏫";
    pub const TROPHY: &str = "🏆";
    pub const EMPTY: &str = "∅";
}
