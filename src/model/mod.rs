pub mod report;
pub mod vocabulary;

pub use report::{Diagnostic, Report};
pub use vocabulary::Vocabulary;
