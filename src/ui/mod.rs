pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{average, error, header, info, section, success, summary_row, warn};
pub use table::{
    group_averages_table, names_table, scores_table, stats_table, student_averages_table,
    TableBuilder,
};
pub use theme::{theme, Theme};
