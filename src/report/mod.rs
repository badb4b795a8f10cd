pub mod formatter;
pub mod model;

pub use formatter::ReportFormatter;
pub use model::*;
