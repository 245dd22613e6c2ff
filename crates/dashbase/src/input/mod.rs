//! Input parsing and upload format handling.

mod format;
mod parser;
mod source;

pub use format::FileType;
pub use parser::{CsvDialect, ParserConfig, TextParser};
pub use source::{Record, SourceInfo};
