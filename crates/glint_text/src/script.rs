//! Script classification policy for the ASCII pre-cache
//!
//! Shared punctuation should take its glyph from neighboring, more specific
//! text. When a font is configured for a language that is not written in
//! Latin script, its handle does not pre-cache common-script characters.

/// Decides which characters count as "common script" and which languages
/// are written in Latin script
pub trait ScriptPolicy {
    fn is_common_script(&self, c: char) -> bool;

    fn language_includes_latin(&self, language: &str) -> bool;
}

/// Default policy: ASCII non-letters are common script; languages are
/// classified by their primary subtag
#[derive(Debug, Default, Clone, Copy)]
pub struct LatinScriptPolicy;

/// Primary language subtags conventionally written in a non-Latin script
const NON_LATIN_LANGUAGES: &[&str] = &[
    "am", "ar", "be", "bg", "bn", "el", "fa", "gu", "he", "hi", "hy", "ja", "ka", "kk", "km",
    "kn", "ko", "ky", "lo", "mk", "ml", "mn", "mr", "my", "ne", "pa", "ps", "ru", "si", "ta",
    "te", "tg", "th", "ti", "uk", "ur", "yi", "zh",
];

impl ScriptPolicy for LatinScriptPolicy {
    fn is_common_script(&self, c: char) -> bool {
        c.is_ascii() && !c.is_ascii_alphabetic()
    }

    fn language_includes_latin(&self, language: &str) -> bool {
        let primary = language
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        !NON_LATIN_LANGUAGES.contains(&primary.as_str())
    }
}
