pub mod formatter;

pub use formatter::{
    format_age, format_analysis_table, format_report, format_score, should_use_colors,
};
