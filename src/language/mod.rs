pub mod core;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use self::core::WordList;

/// Languages a passage can be generated in. `English` is the primary one.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Russian];

    pub fn file_name(&self) -> &'static str {
        match self {
            Language::English => "english.json",
            Language::Russian => "russian.json",
        }
    }

    /// The language after this one, wrapping around
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}
