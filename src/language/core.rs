use std::fs;
use std::io;
use std::path::Path;

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use tracing::info;

use super::Language;
use crate::error::{TextSourceError, WordListError};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A bundled word list
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    pub fn load(language: Language) -> Result<Self, TextSourceError> {
        read_word_list(language)
    }

    /// Sample `num` words uniformly, with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, num: usize) -> Vec<&str> {
        (0..num)
            .filter_map(|_| self.words.choose(rng).map(String::as_str))
            .collect()
    }

    /// Add `words`, dropping blanks and duplicates, and keep the list sorted
    /// case-insensitively. Returns how many new words went in.
    pub fn merge<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.words.len();
        let mut all = std::mem::take(&mut self.words);
        all.extend(
            words
                .into_iter()
                .map(|w| w.into().trim().to_string())
                .filter(|w| !w.is_empty()),
        );
        self.words = all
            .into_iter()
            .unique()
            .sorted_by_cached_key(|w| (w.to_lowercase(), w.clone()))
            .collect();
        self.size = self.words.len() as u32;
        self.words.len().saturating_sub(before)
    }

    /// Merge `words` into the list stored at `path`, creating it when missing.
    pub fn add_to_file(path: &Path, words: &[String]) -> Result<usize, WordListError> {
        let mut list = match fs::read_to_string(path) {
            Ok(contents) => from_str(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => WordList {
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                size: 0,
                words: Vec::new(),
            },
            Err(err) => return Err(err.into()),
        };
        let added = list.merge(words.iter().cloned());
        fs::write(path, serde_json::to_string_pretty(&list)?)?;
        info!(target: "word_list", path = %path.display(), added, size = list.size, "word_list_updated");
        Ok(added)
    }
}

fn read_word_list(language: Language) -> Result<WordList, TextSourceError> {
    let file = LANG_DIR
        .get_file(language.file_name())
        .ok_or(TextSourceError::MissingWordList(language))?;

    let contents = file
        .contents_utf8()
        .ok_or(TextSourceError::MissingWordList(language))?;

    let list: WordList = from_str(contents)
        .map_err(|source| TextSourceError::InvalidWordList { language, source })?;

    if list.words.is_empty() {
        return Err(TextSourceError::EmptyWordList(language));
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn english_list_loads() {
        let list = WordList::load(Language::English).unwrap();
        assert_eq!(list.name, "english");
        assert!(!list.words.is_empty());
        assert_eq!(list.size as usize, list.words.len());
    }

    #[test]
    fn russian_list_loads() {
        let list = WordList::load(Language::Russian).unwrap();
        assert_eq!(list.name, "russian");
        assert!(list.words.iter().any(|w| w.chars().any(|c| !c.is_ascii())));
    }

    #[test]
    fn sample_returns_requested_count_with_replacement() {
        let list = WordList {
            name: "tiny".into(),
            size: 2,
            words: vec!["a".into(), "b".into()],
        };
        let mut rng = StdRng::seed_from_u64(7);
        let words = list.sample(&mut rng, 10);
        assert_eq!(words.len(), 10);
        assert!(words.iter().all(|w| *w == "a" || *w == "b"));
    }

    fn list(words: &[&str]) -> WordList {
        WordList {
            name: "test".into(),
            size: words.len() as u32,
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn merge_dedupes_and_sorts_ignoring_case() {
        let mut l = list(&["pear", "Apple"]);
        let added = l.merge(["banana", "pear", " ", "apple", "banana"]);
        assert_eq!(added, 2);
        assert_eq!(l.words, vec!["Apple", "apple", "banana", "pear"]);
        assert_eq!(l.size, 4);
    }

    #[test]
    fn merge_nothing_new_adds_zero() {
        let mut l = list(&["a", "b"]);
        assert_eq!(l.merge(["b", "a"]), 0);
        assert_eq!(l.words, vec!["a", "b"]);
    }

    #[test]
    fn add_to_file_creates_missing_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ukrainian.json");
        let added = WordList::add_to_file(&path, &["їжак".into(), "кіт".into()]).unwrap();
        assert_eq!(added, 2);

        let stored: WordList = from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored.name, "ukrainian");
        assert_eq!(stored.size, 2);
        assert_eq!(stored.words, vec!["кіт", "їжак"]);
    }

    #[test]
    fn add_to_file_merges_into_existing_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, serde_json::to_string(&list(&["dog", "cat"])).unwrap()).unwrap();

        let added = WordList::add_to_file(&path, &["bird".into(), "cat".into()]).unwrap();
        assert_eq!(added, 1);
        let stored: WordList = from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored.words, vec!["bird", "cat", "dog"]);
        assert_eq!(stored.name, "test");
    }

    #[test]
    fn add_to_file_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[not json").unwrap();
        assert!(matches!(
            WordList::add_to_file(&path, &["x".into()]),
            Err(WordListError::Json(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[not json");
    }

    #[test]
    fn word_list_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 3,
            "words": ["hello", "world", "test"]
        }
        "#;

        let list: WordList = from_str(json_data).expect("Failed to deserialize test word list");

        assert_eq!(list.name, "test");
        assert_eq!(list.size, 3);
        assert!(list.words.contains(&"world".to_string()));
    }
}
