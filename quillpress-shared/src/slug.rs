/// URL slug normalization and unique-slug generation
///
/// A post's slug is derived from its title exactly once, at creation, and
/// is immutable afterwards. Generation is deterministic-then-random:
///
/// 1. Normalize the title into a clean base slug (lowercase, hyphens,
///    capped at 50 chars). If no post has it yet, use it as-is, so the
///    common case keeps a human-readable slug.
/// 2. On collision, append a random 8-hex-char suffix and re-check against
///    the store, looping until an unused candidate is found. With 32 bits
///    of entropy per attempt the loop all but never runs twice.
///
/// The existence check and the insert are not atomic; two concurrent
/// creations can race past the check. The unique constraint on posts.slug
/// is the backstop; the losing insert surfaces as a conflict.
///
/// # Example
///
/// ```
/// use quillpress_shared::slug::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("  Rust & Axum: 2026!  "), "rust-axum-2026");
/// assert_eq!(slugify("日本語"), "");
/// ```

use rand::Rng;
use sqlx::PgPool;

use crate::models::post::Post;

/// Maximum length of the normalized base slug, before any suffix
pub const MAX_BASE_LENGTH: usize = 50;

/// Random bytes per collision-breaking suffix (hex-encoded to 8 chars)
const SUFFIX_BYTES: usize = 4;

/// Normalizes a title into a URL-safe slug base
///
/// Lowercases ASCII alphanumerics, folds every other run of characters into
/// a single hyphen, trims hyphens from both ends, and caps the result at
/// [`MAX_BASE_LENGTH`]. Titles with no ASCII alphanumerics at all normalize
/// to the empty string; [`generate_unique_slug`] turns those into a
/// suffix-only slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len().min(MAX_BASE_LENGTH));
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_BASE_LENGTH {
        slug.truncate(MAX_BASE_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Produces a slug for a new post, unique at the time of the check
///
/// # Errors
///
/// Returns an error only if the existence probe fails; collisions are
/// handled by retrying with a new suffix.
pub async fn generate_unique_slug(pool: &PgPool, title: &str) -> Result<String, sqlx::Error> {
    let base = slugify(title);

    // Fast path: clean, human-readable slug when the base is free.
    if !base.is_empty() && !Post::slug_exists(pool, &base).await? {
        return Ok(base);
    }

    loop {
        let candidate = if base.is_empty() {
            random_suffix()
        } else {
            format!("{}-{}", base, random_suffix())
        };

        if !Post::slug_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }
}

/// Generates an 8-hex-char collision-breaking suffix
fn random_suffix() -> String {
    let bytes: [u8; SUFFIX_BYTES] = rand::thread_rng().gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My First Post"), "my-first-post");
    }

    #[test]
    fn test_slugify_collapses_repeats() {
        assert_eq!(slugify("Hello -- World!!"), "hello-world");
        assert_eq!(slugify("a   b"), "a-b");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  Hello  "), "hello");
        assert_eq!(slugify("---Hello---"), "hello");
    }

    #[test]
    fn test_slugify_mixed_punctuation() {
        assert_eq!(slugify("Rust & Axum: A How-To (2026)"), "rust-axum-a-how-to-2026");
    }

    #[test]
    fn test_slugify_empty_and_non_ascii() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本語のタイトル"), "");
    }

    #[test]
    fn test_slugify_caps_length() {
        let title = "word ".repeat(30);
        let slug = slugify(&title);
        assert!(slug.len() <= MAX_BASE_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_slugify_truncation_trims_exposed_hyphen() {
        // 49 chars of 'a', then the cut lands right after a hyphen
        let title = format!("{} bcdef", "a".repeat(49));
        let slug = slugify(&title);
        assert_eq!(slug, "a".repeat(49));
    }

    #[test]
    fn test_random_suffix_shape() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_random_suffixes_differ() {
        // 32 bits of entropy; two draws colliding means something is broken
        assert_ne!(random_suffix(), random_suffix());
    }

    // Collision-retry behavior against a live store is covered by the
    // integration tests.
}
