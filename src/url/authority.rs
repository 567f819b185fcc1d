use crate::UrlError;
use url::Url;

/// Returns the authority (`scheme://host[:port]`) of a URL
///
/// The host is lowercased and default ports are omitted, so two URLs on the
/// same site always map to the same authority. This is the scope of a
/// robots.txt file.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scrape::url::authority;
///
/// let url = Url::parse("https://EXAMPLE.com/path?q=1").unwrap();
/// assert_eq!(authority(&url).unwrap(), "https://example.com");
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(authority(&url).unwrap(), "http://127.0.0.1:8080");
/// ```
pub fn authority(url: &Url) -> Result<String, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?
        .to_lowercase();

    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// Returns the robots.txt location governing a URL
pub fn robots_url(url: &Url) -> Result<Url, UrlError> {
    let authority = authority(url)?;
    Url::parse(&format!("{}/robots.txt", authority))
        .map_err(|e| UrlError::Malformed(format!("{}: {}", authority, e)))
}
