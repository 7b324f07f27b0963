//! Emoji shortcode rendering
//!
//! Report templates in this crate are authored with `:shortcode:` tokens.
//! [`EmojiConfig`] decides whether those tokens are rendered as Unicode
//! glyphs, and whether platform-sourced text keeps its glyphs or degrades
//! them back to tokens. The flag lives on an explicit value object carried
//! in the run configuration, not in module-level state, so callers (and
//! tests) can hold differently-configured instances side by side.

use regex::Regex;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

/// Matches `:shortcode:` tokens, e.g. `:tada:` or `:heavy_check_mark:`.
static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-zA-Z0-9_+-]+):").expect("shortcode pattern is valid"));

/// Controls conversion between shortcode tokens and Unicode emoji.
///
/// Both conversions are identity functions while `unicode_emoji` is off.
/// When on, they are lossy and best-effort: unknown shortcodes and glyphs
/// without a registered shortcode pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmojiConfig {
    /// Whether Unicode emoji output is enabled.
    pub unicode_emoji: bool,
}

impl EmojiConfig {
    /// Create a config with the given unicode-emoji setting.
    #[must_use]
    pub const fn new(unicode_emoji: bool) -> Self {
        Self { unicode_emoji }
    }

    /// Replace `:shortcode:` tokens with their emoji glyphs.
    #[must_use]
    pub fn emojify(&self, text: &str) -> String {
        if !self.unicode_emoji {
            return text.to_owned();
        }
        SHORTCODE_RE
            .replace_all(text, |caps: &regex::Captures<'_>| {
                emojis::get_by_shortcode(&caps[1])
                    .map_or_else(|| caps[0].to_string(), |emoji| emoji.to_string())
            })
            .into_owned()
    }

    /// Replace emoji glyphs with their `:shortcode:` tokens.
    #[must_use]
    pub fn unemojify(&self, text: &str) -> String {
        if !self.unicode_emoji {
            return text.to_owned();
        }
        let mut out = String::with_capacity(text.len());
        for grapheme in text.graphemes(true) {
            match emojis::get(grapheme).and_then(emojis::Emoji::shortcode) {
                Some(code) => {
                    out.push(':');
                    out.push_str(code);
                    out.push(':');
                }
                None => out.push_str(grapheme),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_emojify_is_identity() {
        let cfg = EmojiConfig::new(false);
        assert_eq!(cfg.emojify(":tada: merged"), ":tada: merged");
    }

    #[test]
    fn test_disabled_unemojify_is_identity() {
        let cfg = EmojiConfig::new(false);
        assert_eq!(cfg.unemojify("🎉 merged"), "🎉 merged");
    }

    #[test]
    fn test_emojify_replaces_known_shortcodes() {
        let cfg = EmojiConfig::new(true);
        assert_eq!(cfg.emojify(":tada: merged :rocket:"), "🎉 merged 🚀");
    }

    #[test]
    fn test_emojify_keeps_unknown_shortcodes() {
        let cfg = EmojiConfig::new(true);
        assert_eq!(
            cfg.emojify(":definitely_not_an_emoji: kept"),
            ":definitely_not_an_emoji: kept"
        );
    }

    #[test]
    fn test_unemojify_replaces_glyphs() {
        let cfg = EmojiConfig::new(true);
        assert_eq!(cfg.unemojify("🎉 shipped"), ":tada: shipped");
    }

    #[test]
    fn test_unemojify_leaves_plain_text_alone() {
        let cfg = EmojiConfig::new(true);
        assert_eq!(cfg.unemojify("chore(deps): bump serde"), "chore(deps): bump serde");
    }

    #[test]
    fn test_known_pair_round_trips() {
        let cfg = EmojiConfig::new(true);
        let tokens = ":rocket: release";
        assert_eq!(cfg.unemojify(&cfg.emojify(tokens)), tokens);
    }
}
