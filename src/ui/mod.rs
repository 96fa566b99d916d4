//! Terminal output for the `lect` binary

pub mod icons;
pub mod output;
pub mod theme;

pub use icons::Icons;
pub use output::{
    annotation_row, dim, error, failure_detail, header, phase, section, stats, success,
    summary_row, timing,
};
pub use theme::{theme, Theme};
