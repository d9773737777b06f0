//! Language detection for query cleaning.
//!
//! Detection is a stopword vote: every word of the input that appears in a
//! language's stopword list counts for that language, and the language with
//! the most votes wins. Text without any stopword is reported as not found.
//!
//! # Examples
//!
//! ```
//! use raven::analysis::language::{Language, LanguageDetector, StopwordLanguageDetector};
//!
//! let detector = StopwordLanguageDetector::new();
//! assert_eq!(detector.detect("the cat and the dog"), Some(Language::English));
//! assert_eq!(detector.detect("el gato y los perros"), Some(Language::Spanish));
//! assert_eq!(detector.detect("xyzzy"), None);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "for",
    "from", "had", "has", "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "me", "my", "no", "not", "of", "on", "or", "our", "she", "so", "such", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "to", "was", "we", "were",
    "what", "when", "where", "which", "who", "why", "will", "with", "would", "you", "your",
];

const FRENCH_STOP_WORDS: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "est", "et", "eux",
    "il", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "mes", "moi", "mon", "ne",
    "nos", "notre", "nous", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa", "se", "ses",
    "son", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos", "votre", "vous",
];

const GERMAN_STOP_WORDS: &[&str] = &[
    "aber", "als", "am", "an", "auch", "auf", "aus", "bei", "bin", "bis", "das", "dass", "dem",
    "den", "der", "des", "die", "doch", "du", "ein", "eine", "einem", "einen", "einer", "er", "es",
    "für", "hat", "ich", "ihr", "im", "in", "ist", "mit", "nach", "nicht", "noch", "nur", "oder",
    "sie", "sind", "so", "über", "um", "und", "uns", "von", "vor", "war", "was", "wie", "wir",
    "zu", "zum", "zur",
];

const SPANISH_STOP_WORDS: &[&str] = &[
    "a", "al", "algo", "como", "con", "de", "del", "desde", "donde", "el", "ella", "en", "entre",
    "es", "esta", "este", "fue", "ha", "hay", "la", "las", "le", "les", "lo", "los", "más", "me",
    "mi", "muy", "no", "nos", "o", "para", "pero", "por", "que", "se", "sin", "sobre", "su",
    "sus", "también", "te", "tu", "un", "una", "uno", "y", "ya", "yo",
];

static ENGLISH_SET: LazyLock<HashSet<String>> = LazyLock::new(|| to_set(ENGLISH_STOP_WORDS));
static FRENCH_SET: LazyLock<HashSet<String>> = LazyLock::new(|| to_set(FRENCH_STOP_WORDS));
static GERMAN_SET: LazyLock<HashSet<String>> = LazyLock::new(|| to_set(GERMAN_STOP_WORDS));
static SPANISH_SET: LazyLock<HashSet<String>> = LazyLock::new(|| to_set(SPANISH_STOP_WORDS));

fn to_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|&s| s.to_string()).collect()
}

/// Languages with a built-in stopword list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    French,
    German,
    Spanish,
}

impl Language {
    /// Every supported language, in detection tie-break order.
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::French,
        Language::German,
        Language::Spanish,
    ];

    /// ISO 639-1 code of the language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
        }
    }

    /// Look a language up by its ISO 639-1 code.
    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    /// The lower-cased stopword set of the language.
    pub fn stop_words(&self) -> &'static HashSet<String> {
        match self {
            Language::English => &ENGLISH_SET,
            Language::French => &FRENCH_SET,
            Language::German => &GERMAN_SET,
            Language::Spanish => &SPANISH_SET,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Detects the language of a piece of text.
pub trait LanguageDetector: Send + Sync {
    /// Returns the detected language, or `None` when no language was found.
    fn detect(&self, text: &str) -> Option<Language>;
}

/// Stopword-vote language detector over the built-in lists.
#[derive(Clone, Debug, Default)]
pub struct StopwordLanguageDetector;

impl StopwordLanguageDetector {
    pub fn new() -> Self {
        StopwordLanguageDetector
    }
}

impl LanguageDetector for StopwordLanguageDetector {
    fn detect(&self, text: &str) -> Option<Language> {
        let words: Vec<String> = text.unicode_words().map(str::to_lowercase).collect();

        let mut best: Option<(Language, usize)> = None;
        for lang in Language::ALL {
            let stop_words = lang.stop_words();
            let votes = words.iter().filter(|w| stop_words.contains(*w)).count();
            // Strictly greater keeps the earlier language on ties.
            if votes > 0 && best.is_none_or(|(_, v)| votes > v) {
                best = Some((lang, votes));
            }
        }

        best.map(|(lang, _)| lang)
    }
}
