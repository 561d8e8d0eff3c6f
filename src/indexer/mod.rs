pub mod dom_parser;
pub mod extractor;
pub mod parser;
pub mod walker;

pub use dom_parser::{CppDomParser, DomParser};
pub use extractor::DeclExtractor;
pub use parser::{ParsedFile, Parser};
pub use walker::FileWalker;
