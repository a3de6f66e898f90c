//! URL slugs for catalog entries.

use std::collections::HashSet;

/// Maximum slug length produced by [`slugify`].
pub const MAX_SLUG_LENGTH: usize = 50;

/// Numbered suffixes tried before falling back to a timestamp.
pub const MAX_SLUG_SUFFIX: u32 = 100;

/// Fold an accented Latin letter to its ASCII base letter.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Turn a title into a slug.
///
/// Lowercases, strips accents, collapses every run of non-alphanumeric
/// characters into one `-`, trims leading/trailing dashes, and truncates to
/// [`MAX_SLUG_LENGTH`] characters.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug.chars().take(MAX_SLUG_LENGTH).collect()
}

/// Choose a slug not present in `taken`.
///
/// Tries `base`, then `base-1` .. `base-100`, then `base-<now_millis>`.
pub fn pick_unique_slug(base: &str, taken: &HashSet<String>, now_millis: i64) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..=MAX_SLUG_SUFFIX)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| format!("{base}-{now_millis}"))
}
