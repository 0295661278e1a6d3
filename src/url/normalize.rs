use crate::UrlError;
use url::Url;

/// Normalizes a URL into the key used by the visited set and result map
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not `http` or `https`
/// 3. Reject URLs without a host
/// 4. Remove the fragment (`#...`), which never changes the fetched page
///
/// Parsing itself lowercases the host, drops default ports and turns an
/// empty path into `/`. Query strings and trailing slashes are kept because
/// they can select different pages.
///
/// # Examples
///
/// ```
/// use page_harvest::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
