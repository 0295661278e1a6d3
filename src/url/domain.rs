use url::Url;

/// Extracts the host identity used by the same-domain filter
///
/// The host is lowercased. An explicit non-default port is kept as part of
/// the identity (`host:port`), so two servers on the same machine but
/// different ports are different sites. Subdomains are never folded into
/// their parent.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_harvest::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
