//! Reading delimited files into records.

mod options;
mod reader;
mod split;

pub use options::ReaderOptions;
pub use reader::TabbedFile;
