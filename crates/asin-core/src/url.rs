//! Fast URL slicing for the navigation path
//!
//! Parsing works directly on string slices. Only the host is copied,
//! lowercased, for domain comparison.

/// Error type for URL slicing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("Missing scheme separator")]
    MissingScheme,
    #[error("Invalid scheme")]
    InvalidScheme,
    #[error("Empty host")]
    EmptyHost,
    #[error("Invalid character at byte {0}")]
    InvalidChar(usize),
}

/// Borrowed view of a URL split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl<'a> {
    pub scheme: &'a str,
    /// Hostname without userinfo or port, lowercased.
    pub host: String,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> ParsedUrl<'a> {
    /// Split `url` into scheme, host, path, query and fragment.
    pub fn parse(url: &'a str) -> Result<Self, UrlError> {
        let invalid = url.bytes().position(|b| b.is_ascii_whitespace() || b.is_ascii_control());
        if let Some(pos) = invalid {
            return Err(UrlError::InvalidChar(pos));
        }

        let scheme_end = get_scheme_end(url).ok_or(UrlError::MissingScheme)?;
        let scheme = &url[..scheme_end - 3];
        if !is_valid_scheme(scheme) {
            return Err(UrlError::InvalidScheme);
        }

        let (host_start, host_end) = get_host_position(url).ok_or(UrlError::MissingScheme)?;
        let host = &url[host_start..host_end];
        if host.is_empty() {
            return Err(UrlError::EmptyHost);
        }

        let rest = &url[authority_end(url, scheme_end)..];
        let (before_fragment, fragment) = match rest.find('#') {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
            None => (rest, None),
        };
        let (path, query) = match before_fragment.find('?') {
            Some(pos) => (&before_fragment[..pos], Some(&before_fragment[pos + 1..])),
            None => (before_fragment, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        Ok(Self {
            scheme,
            host: host.to_ascii_lowercase(),
            path,
            query,
            fragment,
        })
    }

    /// Check whether the host contains `needle` (already lowercase).
    #[inline]
    pub fn host_contains(&self, needle: &str) -> bool {
        self.host.contains(needle)
    }
}

// =============================================================================
// Scheme
// =============================================================================

/// Get the position after "://".
#[inline]
fn get_scheme_end(url: &str) -> Option<usize> {
    let bytes = url.as_bytes();
    let colon_pos = bytes.iter().position(|&b| b == b':')?;

    if bytes.len() > colon_pos + 2 && bytes[colon_pos + 1] == b'/' && bytes[colon_pos + 2] == b'/' {
        return Some(colon_pos + 3);
    }

    None
}

#[inline]
fn is_valid_scheme(scheme: &str) -> bool {
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
}

// =============================================================================
// Host
// =============================================================================

/// End of the authority section: first of '/', '?', '#' after the scheme.
#[inline]
fn authority_end(url: &str, scheme_end: usize) -> usize {
    url.as_bytes()[scheme_end..]
        .iter()
        .position(|&b| b == b'/' || b == b'?' || b == b'#')
        .map_or(url.len(), |i| scheme_end + i)
}

/// Get the start and end positions of the hostname in a URL.
#[inline]
fn get_host_position(url: &str) -> Option<(usize, usize)> {
    let scheme_end = get_scheme_end(url)?;
    let auth_end = authority_end(url, scheme_end);
    let bytes = url.as_bytes();

    // Skip userinfo
    let host_start = bytes[scheme_end..auth_end]
        .iter()
        .rposition(|&b| b == b'@')
        .map_or(scheme_end, |i| scheme_end + i + 1);

    let host_end = bytes[host_start..auth_end]
        .iter()
        .position(|&b| b == b':')
        .map_or(auth_end, |i| host_start + i);

    Some((host_start, host_end))
}
