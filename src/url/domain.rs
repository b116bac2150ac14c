use std::fmt;
use url::Url;

/// Host and port of a URL, used to decide whether a link stays on the site
///
/// The port is only present when it is written explicitly and differs from
/// the scheme default, since `url` drops default ports while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkLocation {
    pub host: String,
    pub port: Option<u16>,
}

impl fmt::Display for NetworkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Extracts the network location from a URL
///
/// # Returns
///
/// * `Some(NetworkLocation)` - The lowercase host and explicit port
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_harvest::url::network_location;
///
/// let url = Url::parse("https://EXAMPLE.com:8443/path").unwrap();
/// assert_eq!(network_location(&url).unwrap().to_string(), "example.com:8443");
/// ```
pub fn network_location(url: &Url) -> Option<NetworkLocation> {
    url.host_str().map(|h| NetworkLocation {
        host: h.to_lowercase(),
        port: url.port(),
    })
}

/// Returns true if the candidate shares the origin's host and port exactly
///
/// Subdomains are distinct sites: `blog.example.com` is external to
/// `example.com`.
pub fn is_internal(origin: &NetworkLocation, candidate: &Url) -> bool {
    network_location(candidate).as_ref() == Some(origin)
}
