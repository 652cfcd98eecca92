//! Site-level tunables, passed explicitly into the services.

/// Configuration for listing and validation behavior.
///
/// These are deliberately not ambient constants: every service that needs a
/// page size or a length limit receives a `SiteConfig`.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Number of posts per listing page.
    pub page_size: u64,
    /// Maximum length of bounded string fields (titles, names).
    pub charfield_max_length: usize,
    /// Length at which display headings are truncated in summaries.
    pub display_truncate_length: usize,
    /// When true, commenting requires the target post to be visible to the
    /// commenter. The reference behavior is lenient: a post's existence is
    /// enough, even if the viewer could not read it.
    pub strict_comment_visibility: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            charfield_max_length: 256,
            display_truncate_length: 30,
            strict_comment_visibility: false,
        }
    }
}

/// Truncate a heading to `max` characters for display, respecting char
/// boundaries.
pub fn truncate_heading(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
