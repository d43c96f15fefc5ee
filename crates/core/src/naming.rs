//! Category key derivation.
//!
//! Keys are the foreign key topics use to reference their category. They are
//! derived once, at creation, from the category name plus a uniqueness suffix,
//! and never change afterwards.

use std::sync::LazyLock;

use regex::Regex;

/// Key of the protected default category.
pub const GENERAL_RULES_KEY: &str = "general-rules";

/// Slug used when nothing survives normalisation (e.g. an emoji-only name).
pub const FALLBACK_SLUG: &str = "category";

/// Anything that is not a word character or whitespace. Unicode-aware, so
/// Cyrillic letters survive while emoji and punctuation are dropped.
static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalise a category name into a slug without the uniqueness suffix.
///
/// Returns [`FALLBACK_SLUG`] when the normalised name is empty.
///
/// # Examples
///
/// ```
/// use forum_core::naming::slugify;
///
/// assert_eq!(slugify("  Game News!  "), "game-news");
/// assert_eq!(slugify("🎮🎮"), "category");
/// ```
pub fn slugify(name: &str) -> String {
    let stripped = STRIP_RE.replace_all(name, "");
    let lowered = stripped.trim().to_lowercase();
    let slug = WHITESPACE_RE.replace_all(&lowered, "-");
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.into_owned()
    }
}

/// Derive a category key: `{slug}-{suffix}`.
///
/// The suffix is the category's allocated id, which is unique within the
/// collection, so two categories with identical names still get distinct keys.
pub fn category_key(name: &str, suffix: i64) -> String {
    format!("{}-{suffix}", slugify(name))
}
