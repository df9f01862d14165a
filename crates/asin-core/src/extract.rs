//! Identifier extraction
//!
//! Parses the URL, applies the domain guard, then tries every shape in
//! priority order against the path.

use crate::asin::Asin;
use crate::shape::{all_shapes, ShapeId};
use crate::types::IgnoreReason;
use crate::url::ParsedUrl;

/// Hosts must contain this to be considered.
pub const DOMAIN_GUARD: &str = "amazon.co.jp";

/// Extract the identifier from `url`, if any shape matches.
#[inline]
pub fn extract_asin(url: &str) -> Option<Asin> {
    extract_with_shape(url).map(|(asin, _)| asin)
}

/// Extract the identifier and the shape that matched.
pub fn extract_with_shape(url: &str) -> Option<(Asin, ShapeId)> {
    try_extract(url).ok()
}

/// Extract the identifier, or say why none was found.
pub fn try_extract(url: &str) -> Result<(Asin, ShapeId), IgnoreReason> {
    let parsed = match ParsedUrl::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!("unparseable URL {:?}: {}", url, e);
            return Err(IgnoreReason::Malformed);
        }
    };

    if !parsed.host_contains(DOMAIN_GUARD) {
        return Err(IgnoreReason::ForeignHost);
    }

    all_shapes()
        .find_map(|shape| shape.find(parsed.path).map(|asin| (asin, shape.id)))
        .ok_or(IgnoreReason::NotProductPage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::build_canonical_url;

    const ID: &str = "B08N5WRWNW";

    fn expect(url: &str, shape: ShapeId) {
        let (asin, got) = extract_with_shape(url).unwrap_or_else(|| panic!("no match: {url}"));
        assert_eq!(asin.as_str(), ID, "{url}");
        assert_eq!(got, shape, "{url}");
        assert_eq!(build_canonical_url(&asin), "https://www.amazon.co.jp/dp/B08N5WRWNW");
    }

    #[test]
    fn test_every_legacy_shape() {
        let base = "https://www.amazon.co.jp";
        let cases = [
            ("/exec/obidos/ASIN/B08N5WRWNW", ShapeId::ExecObidosAsin),
            ("/o/ASIN/B08N5WRWNW/ref=nosim", ShapeId::OAsin),
            ("/exec/obidos/ISBN=B08N5WRWNW", ShapeId::ExecObidosIsbnEq),
            ("/exec/obidos/ISBN%3DB08N5WRWNW", ShapeId::ExecObidosIsbnPct),
            ("/o/ISBN=B08N5WRWNW", ShapeId::OIsbnEq),
            ("/exec/obidos/tg/detail/-/B08N5WRWNW", ShapeId::ExecObidosDetail),
            ("/exec/obidos/tg/detail/-/Elements-Style/B08N5WRWNW", ShapeId::ExecObidosDetailSlug),
            ("/o/tg/detail/-/B08N5WRWNW", ShapeId::ODetail),
            ("/o/tg/detail/-/Elements-Style/B08N5WRWNW", ShapeId::ODetailSlug),
            ("/gp/product/B08N5WRWNW", ShapeId::GpProduct),
            ("/gp/product/product-description/B08N5WRWNW", ShapeId::GpProductDescription),
            ("/Elements-Style/dp/B08N5WRWNW", ShapeId::SlugDp),
            ("/Elements-Style/dp/product-description/B08N5WRWNW", ShapeId::SlugDpDescription),
            ("/dp/B08N5WRWNW?psc=1", ShapeId::DpFallback),
        ];

        for (path, shape) in cases {
            expect(&format!("{base}{path}"), shape);
        }
    }

    #[test]
    fn test_trailing_slug_shape_is_caught_earlier() {
        // The trailing-slash variant is subsumed by the plain slug shape.
        expect(
            "https://www.amazon.co.jp/%E3%83%97%E3%83%AD%E3%82%B0%E3%83%A9%E3%83%9F%E3%83%B3%E3%82%B0Rust-%E7%AC%AC2%E7%89%88-Jim-Blandy/dp/B08N5WRWNW/",
            ShapeId::SlugDp,
        );
    }

    #[test]
    fn test_slug_with_ref_segment() {
        expect("https://www.amazon.co.jp/Some-Book-Title/dp/B08N5WRWNW/ref=xyz", ShapeId::SlugDp);
    }

    #[test]
    fn test_other_amazon_hosts_pass_guard() {
        expect("https://amazon.co.jp/gp/product/B08N5WRWNW", ShapeId::GpProduct);
        expect("http://WWW.AMAZON.CO.JP/o/ASIN/B08N5WRWNW", ShapeId::OAsin);
    }

    #[test]
    fn test_domain_guard() {
        assert_eq!(extract_asin("https://www.example.com/dp/B08N5WRWNW"), None);
        assert_eq!(
            try_extract("https://www.amazon.com/dp/B08N5WRWNW"),
            Err(IgnoreReason::ForeignHost)
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(extract_asin("not a url"), None);
        assert_eq!(try_extract("not a url"), Err(IgnoreReason::Malformed));
        assert_eq!(try_extract(""), Err(IgnoreReason::Malformed));
    }

    #[test]
    fn test_not_product_page() {
        for url in [
            "https://www.amazon.co.jp/",
            "https://www.amazon.co.jp/s?k=rust",
            "https://www.amazon.co.jp/gp/cart/view.html",
            "https://www.amazon.co.jp/o/ASIN=B08N5WRWNW",
            "https://www.amazon.co.jp/gp/product/B08N5",
        ] {
            assert_eq!(try_extract(url), Err(IgnoreReason::NotProductPage), "{url}");
        }
    }

    #[test]
    fn test_query_is_not_searched() {
        assert_eq!(
            try_extract("https://www.amazon.co.jp/s?ref=/dp/B08N5WRWNW"),
            Err(IgnoreReason::NotProductPage)
        );
    }

    #[test]
    fn test_first_shape_wins() {
        // Both an obidos shape and a dp shape are present; obidos comes first.
        let url = "https://www.amazon.co.jp/Title/dp/AAAAAAAAAA/exec/obidos/ASIN/B08N5WRWNW";
        let (asin, shape) = extract_with_shape(url).unwrap();
        assert_eq!(asin.as_str(), ID);
        assert_eq!(shape, ShapeId::ExecObidosAsin);
    }

    #[test]
    fn test_deterministic() {
        let url = "https://www.amazon.co.jp/gp/product/B08N5WRWNW";
        assert_eq!(extract_with_shape(url), extract_with_shape(url));
    }
}
