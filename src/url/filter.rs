use crate::url::extract_host;
use url::Url;

/// Path fragments that mark a link as a downloadable resource, not a page
pub const RESOURCE_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".jpg", ".png", ".gif", ".zip", ".rar",
];

/// Returns true if the path contains any known non-page extension
///
/// This is a substring check, so `/archive.zip-info` is also treated as a
/// resource.
pub fn is_resource_path(path: &str) -> bool {
    RESOURCE_EXTENSIONS.iter().any(|ext| path.contains(ext))
}

/// Decides which resolved links stay inside one crawl
///
/// A link is valid iff its scheme is `http`/`https`, its host identity
/// equals the start host exactly, and its path is not a resource path.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    host: Option<String>,
}

impl LinkFilter {
    /// Builds a filter scoped to the host of `start_url`
    pub fn for_start_url(start_url: &Url) -> Self {
        Self {
            host: extract_host(start_url),
        }
    }

    /// Builds a filter from a raw start URL string
    ///
    /// A start URL that does not parse produces a filter that rejects
    /// everything.
    pub fn for_start_str(start_url: &str) -> Self {
        match Url::parse(start_url) {
            Ok(url) => Self::for_start_url(&url),
            Err(_) => Self { host: None },
        }
    }

    /// The host identity links must match
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Applies all three validity rules to a resolved link
    pub fn is_valid(&self, link: &Url) -> bool {
        if link.scheme() != "http" && link.scheme() != "https" {
            return false;
        }

        match (&self.host, extract_host(link)) {
            (Some(expected), Some(actual)) if *expected == actual => {}
            _ => return false,
        }

        !is_resource_path(link.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> LinkFilter {
        LinkFilter::for_start_str("https://example.com/")
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_host_is_valid() {
        assert!(filter().is_valid(&url("https://example.com/about")));
    }

    #[test]
    fn test_scheme_change_same_host_is_valid() {
        assert!(filter().is_valid(&url("http://example.com/about")));
    }

    #[test]
    fn test_other_host_rejected() {
        assert!(!filter().is_valid(&url("https://other.com/")));
    }

    #[test]
    fn test_subdomain_rejected() {
        assert!(!filter().is_valid(&url("https://blog.example.com/")));
    }

    #[test]
    fn test_different_port_rejected() {
        assert!(!filter().is_valid(&url("https://example.com:8443/")));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        assert!(!filter().is_valid(&url("ftp://example.com/file")));
        assert!(!filter().is_valid(&url("mailto:me@example.com")));
    }

    #[test]
    fn test_resource_extensions_rejected() {
        for path in ["/file.pdf", "/a.doc", "/a.docx", "/img.jpg", "/img.png", "/anim.gif", "/x.zip", "/x.rar"] {
            let link = url(&format!("https://example.com{}", path));
            assert!(!filter().is_valid(&link), "{} should be rejected", path);
        }
    }

    #[test]
    fn test_resource_extension_substring_match() {
        assert!(!filter().is_valid(&url("https://example.com/archive.zip-info")));
        assert!(is_resource_path("/downloads/report.pdf/view"));
    }

    #[test]
    fn test_extension_in_query_is_not_checked() {
        assert!(filter().is_valid(&url("https://example.com/view?file=a.pdf")));
    }

    #[test]
    fn test_unparseable_start_rejects_everything() {
        let filter = LinkFilter::for_start_str("not a url");
        assert_eq!(filter.host(), None);
        assert!(!filter.is_valid(&url("https://example.com/")));
    }
}
