//! Tag normalization collaborator
//!
//! The engine hands each record's raw tag string to a [`TagNormalizer`] once,
//! after collection and before persistence. The trait keeps the engine
//! independent of any particular text-processing backend; applications with
//! a real lemmatizer inject their own implementation.

/// Text-normalization capability for free-text tag strings.
///
/// Input is the API's comma-separated tag string; output must keep the comma
/// separation intact, since the persistence layer splits on commas to
/// resolve individual tag entities.
pub trait TagNormalizer: Send + Sync {
    /// Normalize one raw tag string
    fn normalize(&self, tags: &str) -> String;
}

/// Default normalizer: lowercases every tag and strips common English
/// plural suffixes per word, rejoining with `", "`.
///
/// Deliberately small — a suffix stripper, not a dictionary lemmatizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicLemmatizer;

impl BasicLemmatizer {
    fn lemmatize_word(word: &str) -> String {
        let word = word.to_lowercase();
        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() >= 2 {
                return format!("{stem}y");
            }
        }
        for suffix in ["ches", "shes", "sses", "xes", "zes"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{stem}{}", &suffix[..suffix.len() - 2]);
            }
        }
        if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") {
            return word[..word.len() - 1].to_string();
        }
        word
    }
}

impl TagNormalizer for BasicLemmatizer {
    fn normalize(&self, tags: &str) -> String {
        tags.split(',')
            .map(|tag| {
                tag.split_whitespace()
                    .map(Self::lemmatize_word)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Pass-through normalizer that only tidies separators
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl TagNormalizer for IdentityNormalizer {
    fn normalize(&self, tags: &str) -> String {
        tags.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
