pub mod checker;
pub mod cli;
pub mod config;
pub mod file;
pub mod language;

pub use checker::dictionary::Dictionary;
pub use checker::tokenizer::{Token, Tokenizer};
pub use checker::{Check, CheckError, CheckSummary, Issue, Reporter};
pub use config::Config;
pub use file::CheckFile;
pub use language::Language;
