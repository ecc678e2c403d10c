//! Boyne printable conditions reports.

mod parser;
mod strategies;

pub use parser::parse_printable;
pub use strategies::BoyneReportStrategy;
