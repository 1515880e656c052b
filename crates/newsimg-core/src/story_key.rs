//! Filesystem-safe cache keys derived from story titles.

use std::fmt;

use chrono::Utc;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of a story key, in characters.
pub const MAX_KEY_LEN: usize = 120;

/// Slugify a title: ASCII-fold, lower-case, collapse every run of
/// non-alphanumeric characters to a single `-`, trim separators, and cut to
/// [`MAX_KEY_LEN`].
///
/// Returns an empty string when the title contains nothing sluggable.
#[must_use]
pub fn story_slug(title: &str) -> String {
    let folded: String = title
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_ascii_lowercase();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_sep = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    slug.truncate(MAX_KEY_LEN);
    let trimmed_len = slug.trim_end_matches('-').len();
    slug.truncate(trimmed_len);
    slug
}

/// Normalized identifier of a story in the image cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoryKey {
    key: String,
    stable: bool,
}

impl StoryKey {
    /// Derive the key for a story title.
    ///
    /// Titles with no sluggable characters get a time-based `story-<secs>`
    /// key. Such keys differ between calls; see [`StoryKey::is_stable`].
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        let slug = story_slug(title);
        if slug.is_empty() {
            Self {
                key: format!("story-{}", Utc::now().timestamp()),
                stable: false,
            }
        } else {
            Self {
                key: slug,
                stable: true,
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// `false` when the key is a time-based fallback.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.stable
    }
}

impl fmt::Display for StoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for StoryKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple_title() {
        assert_eq!(
            story_slug("Tor releases Snowflake update"),
            "tor-releases-snowflake-update"
        );
    }

    #[test]
    fn slug_collapses_punctuation_runs() {
        assert_eq!(
            story_slug("EFF: \"Stop the Spying!\" -- now"),
            "eff-stop-the-spying-now"
        );
    }

    #[test]
    fn slug_folds_accents_to_ascii() {
        assert_eq!(story_slug("Café Privacy Über Alles"), "cafe-privacy-uber-alles");
    }

    #[test]
    fn slug_drops_non_latin_text() {
        assert_eq!(story_slug("新闻 VPN report"), "vpn-report");
    }

    #[test]
    fn slug_splits_apostrophes() {
        assert_eq!(story_slug("Mozilla's new policy"), "mozilla-s-new-policy");
    }

    #[test]
    fn slug_is_bounded_and_has_no_trailing_separator() {
        let title = format!("{} end", "word ".repeat(60));
        let slug = story_slug(&title);
        assert!(slug.len() <= MAX_KEY_LEN, "len {}", slug.len());
        assert!(!slug.ends_with('-'));
        assert!(!slug.starts_with('-'));
    }

    #[test]
    fn slug_is_deterministic() {
        let title = "Mullvad audits its VPN app — again";
        assert_eq!(story_slug(title), story_slug(title));
        assert_eq!(StoryKey::from_title(title), StoryKey::from_title(title));
    }

    #[test]
    fn punctuation_only_title_gets_fallback_key() {
        let key = StoryKey::from_title("!!! ???");
        assert!(key.as_str().starts_with("story-"));
        assert!(!key.is_stable());
    }

    #[test]
    fn normal_title_key_is_stable() {
        let key = StoryKey::from_title("Snowflake");
        assert_eq!(key.as_str(), "snowflake");
        assert!(key.is_stable());
        assert_eq!(key.to_string(), "snowflake");
    }
}
