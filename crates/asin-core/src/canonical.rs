//! Canonical product URLs
//!
//! The canonical form is `https://www.amazon.co.jp/dp/<ASIN>`. Anything the
//! builder produces must be recognized by the checker, or the redirector
//! would loop.

use serde::{Deserialize, Serialize};

use crate::asin::{is_asin_byte, Asin, ASIN_LEN};

/// Canonical URL prefix, up to the identifier.
pub const CANONICAL_PREFIX: &str = "https://www.amazon.co.jp/dp/";

/// How query strings on an otherwise canonical URL are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryPolicy {
    /// `/dp/<id>?...` is rewritten to the bare form
    #[default]
    Strip,
    /// `/dp/<id>?...` is left alone
    Keep,
}

/// Build the canonical URL for `asin`.
#[inline]
pub fn build_canonical_url(asin: &Asin) -> String {
    let mut url = String::with_capacity(CANONICAL_PREFIX.len() + ASIN_LEN);
    url.push_str(CANONICAL_PREFIX);
    url.push_str(asin.as_str());
    url
}

/// Check whether `url` is already canonical under the default policy.
#[inline]
pub fn is_canonical(url: &str) -> bool {
    is_canonical_with(url, QueryPolicy::default())
}

/// Check whether `url` is already canonical.
///
/// Accepts the prefix, exactly ten identifier characters, an optional single
/// `/`, and under [`QueryPolicy::Keep`] an optional `?query`.
pub fn is_canonical_with(url: &str, policy: QueryPolicy) -> bool {
    let Some(rest) = url.strip_prefix(CANONICAL_PREFIX) else {
        return false;
    };

    let bytes = rest.as_bytes();
    if bytes.len() < ASIN_LEN || !bytes[..ASIN_LEN].iter().all(|&b| is_asin_byte(b)) {
        return false;
    }

    let tail = &rest[ASIN_LEN..];
    let tail = tail.strip_prefix('/').unwrap_or(tail);

    match policy {
        QueryPolicy::Strip => tail.is_empty(),
        QueryPolicy::Keep => tail.is_empty() || tail.starts_with('?'),
    }
}
