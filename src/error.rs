use thiserror::Error;

use crate::language::Language;

#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("no word list bundled for {0}")]
    MissingWordList(Language),
    #[error("word list for {language} could not be parsed: {source}")]
    InvalidWordList {
        language: Language,
        #[source]
        source: serde_json::Error,
    },
    #[error("word list for {0} is empty")]
    EmptyWordList(Language),
    #[error("word count must be positive")]
    ZeroWords,
}

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("word list file could not be accessed: {0}")]
    Io(#[from] std::io::Error),
    #[error("word list file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("passage must contain at least one character")]
    EmptyPassage,
}
