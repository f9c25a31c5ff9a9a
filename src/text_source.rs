use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::error::TextSourceError;
use crate::language::{Language, WordList};

/// Produces passages for new sessions
pub trait TextSource {
    fn request_passage(
        &mut self,
        word_count: usize,
        language: Language,
    ) -> Result<String, TextSourceError>;
}

/// Random words from the bundled word list of each language
#[derive(Debug, Default)]
pub struct WordListSource;

impl TextSource for WordListSource {
    fn request_passage(
        &mut self,
        word_count: usize,
        language: Language,
    ) -> Result<String, TextSourceError> {
        if word_count == 0 {
            return Err(TextSourceError::ZeroWords);
        }
        let list = WordList::load(language)?;
        let mut rng = rand::thread_rng();
        Ok(list.sample(&mut rng, word_count).join(" "))
    }
}

/// Always hands out the same user supplied text
#[derive(Debug, Clone)]
pub struct FixedSource {
    text: String,
}

impl FixedSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextSource for FixedSource {
    fn request_passage(&mut self, _: usize, _: Language) -> Result<String, TextSourceError> {
        Ok(self.text.clone())
    }
}

const FALLBACK_WORDS: &[&str] = &[
    "time", "year", "people", "way", "day", "man", "thing", "woman", "life", "child", "world",
    "school", "state", "family", "group", "country", "problem", "hand", "part", "place", "case",
    "week", "system", "program", "question", "work", "number", "night", "point", "home", "water",
    "room", "mother", "area", "money", "story", "fact", "month", "lot", "right", "study", "book",
    "eye", "job", "word", "business", "issue", "side", "kind", "head", "house", "service",
    "friend", "father", "power", "hour", "game", "line", "end", "member", "law", "car", "city",
    "name", "team", "minute", "idea", "kid", "body", "back", "parent", "face", "others", "level",
    "office", "door", "health", "person", "art", "war", "history", "party", "result", "change",
    "morning", "reason", "research", "girl", "guy", "moment", "air", "doctor", "force",
];

/// Local generator used when the real source fails.
///
/// Each call advances the seed, so consecutive passages differ while a given
/// starting seed always yields the same sequence.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    seed: u64,
}

impl FallbackGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn generate(&mut self, word_count: usize) -> String {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.seed = self.seed.wrapping_add(1);
        let count = word_count.max(1);
        (0..count)
            .filter_map(|_| FALLBACK_WORDS.choose(&mut rng).copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(0x7e57)
    }
}

/// Wraps a source and never fails: errors and blank output are replaced by
/// the fallback generator.
pub struct ResilientSource {
    primary: Box<dyn TextSource>,
    fallback: FallbackGenerator,
}

impl ResilientSource {
    pub fn new(primary: Box<dyn TextSource>) -> Self {
        Self::with_fallback(primary, FallbackGenerator::default())
    }

    pub fn with_fallback(primary: Box<dyn TextSource>, fallback: FallbackGenerator) -> Self {
        Self { primary, fallback }
    }

    pub fn passage(&mut self, word_count: usize, language: Language) -> String {
        match self.primary.request_passage(word_count, language) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(target: "text_source", word_count, %language, chars = text.chars().count(), "passage_ready");
                text
            }
            Ok(_) => {
                warn!(target: "text_source", word_count, %language, "blank_passage_fallback");
                self.fallback.generate(word_count)
            }
            Err(err) => {
                warn!(target: "text_source", word_count, %language, error = %err, "source_failed_fallback");
                self.fallback.generate(word_count)
            }
        }
    }
}

impl TextSource for ResilientSource {
    fn request_passage(
        &mut self,
        word_count: usize,
        language: Language,
    ) -> Result<String, TextSourceError> {
        Ok(self.passage(word_count, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct FailingSource;

    impl TextSource for FailingSource {
        fn request_passage(&mut self, _: usize, l: Language) -> Result<String, TextSourceError> {
            Err(TextSourceError::MissingWordList(l))
        }
    }

    fn word_count(s: &str) -> usize {
        s.split(' ').count()
    }

    #[test]
    fn word_list_source_returns_requested_words() {
        let mut source = WordListSource;
        let text = source.request_passage(30, Language::English).unwrap();
        assert_eq!(word_count(&text), 30);
        assert!(!text.starts_with(' ') && !text.ends_with(' '));
    }

    #[test]
    fn word_list_source_supports_russian() {
        let mut source = WordListSource;
        let text = source.request_passage(10, Language::Russian).unwrap();
        assert_eq!(word_count(&text), 10);
    }

    #[test]
    fn word_list_source_rejects_zero_words() {
        let mut source = WordListSource;
        assert_matches!(
            source.request_passage(0, Language::English),
            Err(TextSourceError::ZeroWords)
        );
    }

    #[test]
    fn fixed_source_ignores_parameters() {
        let mut source = FixedSource::new("custom test prompt");
        assert_eq!(
            source.request_passage(50, Language::Russian).unwrap(),
            "custom test prompt"
        );
    }

    #[test]
    fn fallback_is_deterministic_per_seed() {
        let mut a = FallbackGenerator::new(42);
        let mut b = FallbackGenerator::new(42);
        assert_eq!(a.generate(20), b.generate(20));
    }

    #[test]
    fn fallback_varies_between_calls() {
        let mut g = FallbackGenerator::new(42);
        let first = g.generate(20);
        let second = g.generate(20);
        assert_ne!(first, second);
        assert_eq!(word_count(&first), 20);
    }

    #[test]
    fn fallback_never_empty() {
        let mut g = FallbackGenerator::default();
        assert!(!g.generate(0).is_empty());
    }

    #[test]
    fn resilient_source_falls_back_on_error() {
        let mut source = ResilientSource::new(Box::new(FailingSource));
        let text = source.passage(5, Language::English);
        assert_eq!(word_count(&text), 5);
    }

    #[test]
    fn resilient_source_falls_back_on_blank_text() {
        let mut source = ResilientSource::new(Box::new(FixedSource::new("   ")));
        let text = source.passage(3, Language::English);
        assert!(!text.trim().is_empty());
    }

    #[test]
    fn resilient_source_passes_through_good_text() {
        let mut source = ResilientSource::new(Box::new(FixedSource::new("cat dog")));
        assert_eq!(source.request_passage(2, Language::English).unwrap(), "cat dog");
    }
}
