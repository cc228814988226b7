//! Home page detection.

/// Whether `path` is the site's home page.
///
/// Matches `/`, `/index` and `/index.html` exactly, plus any path whose
/// last segment is `index` or `index.<ext>`. Paths that merely contain
/// the word, such as `/my-index-page`, do not match.
#[must_use]
pub fn is_home_page(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if matches!(path, "" | "/" | "/index" | "/index.html") {
        return true;
    }
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    last == "index" || last.starts_with("index.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_home_paths() {
        assert!(is_home_page("/"));
        assert!(is_home_page("/index"));
        assert!(is_home_page("/index.html"));
        assert!(is_home_page("/?page=2"));
    }

    #[test]
    fn test_nested_index_documents() {
        assert!(is_home_page("/blog/index.html"));
        assert!(is_home_page("/blog/index/"));
    }

    #[test]
    fn test_substring_is_not_enough() {
        assert!(!is_home_page("/my-index-page"));
        assert!(!is_home_page("/reindex"));
        assert!(!is_home_page("/posts/42"));
    }
}
