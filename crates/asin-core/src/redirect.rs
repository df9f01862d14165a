//! Redirect orchestration
//!
//! Every navigation goes through here: gate on resource type and status,
//! stop on canonical URLs, otherwise extract and build the target.

use crate::canonical::{build_canonical_url, is_canonical_with};
use crate::config::RedirectConfig;
use crate::extract::try_extract;
use crate::types::{Decision, IgnoreReason, NavStatus, NavigationEvent};

/// Stateless redirector. Holds only its configuration.
#[derive(Debug, Clone, Default)]
pub struct Redirector {
    config: RedirectConfig,
}

impl Redirector {
    pub fn new(config: RedirectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Decide what to do with a navigation.
    pub fn evaluate(&self, event: &NavigationEvent<'_>) -> Decision {
        if !self.config.resource_types.intersects(event.request_type) {
            return Decision::Ignored(IgnoreReason::ResourceType);
        }

        if self.config.require_complete && event.status != NavStatus::Complete {
            return Decision::Ignored(IgnoreReason::NotComplete);
        }

        let decision = self.evaluate_url(event.url);
        match &decision {
            Decision::Redirect { target, shape, .. } => {
                let shape = shape.as_str();
                log::info!("tab {}: {} -> {} ({})", event.tab_id, event.url, target, shape);
            }
            Decision::Canonical => log::debug!("tab {}: already canonical", event.tab_id),
            Decision::Ignored(reason) => {
                log::debug!("tab {}: ignored {} ({})", event.tab_id, event.url, reason.as_str());
            }
        }
        decision
    }

    /// Decide on a bare URL, skipping event gating.
    pub fn evaluate_url(&self, url: &str) -> Decision {
        if is_canonical_with(url, self.config.query_policy) {
            return Decision::Canonical;
        }

        let (asin, shape) = match try_extract(url) {
            Ok(found) => found,
            Err(reason) => return Decision::Ignored(reason),
        };

        let target = build_canonical_url(&asin);
        if target == url {
            return Decision::Canonical;
        }

        Decision::Redirect { asin, shape, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::QueryPolicy;
    use crate::shape::{all_shapes, ShapeId};
    use crate::types::RequestType;
    use crate::Asin;

    const TARGET: &str = "https://www.amazon.co.jp/dp/B08N5WRWNW";

    fn redirect_target(url: &str) -> Option<String> {
        Redirector::default()
            .evaluate(&NavigationEvent::main_frame(url, 1))
            .target()
            .map(str::to_string)
    }

    #[test]
    fn test_scenarios() {
        for url in [
            "https://www.amazon.co.jp/gp/product/B08N5WRWNW",
            "https://www.amazon.co.jp/Some-Book-Title/dp/B08N5WRWNW/ref=xyz",
            "https://www.amazon.co.jp/dp/B08N5WRWNW?psc=1",
            "https://www.amazon.co.jp/exec/obidos/tg/detail/-/Elements-Style/B08N5WRWNW",
        ] {
            assert_eq!(redirect_target(url).as_deref(), Some(TARGET), "{url}");
        }
        assert_eq!(redirect_target("https://www.amazon.co.jp/dp/B08N5WRWNW"), None);
    }

    #[test]
    fn test_canonical_is_fixed_point() {
        let redirector = Redirector::default();
        assert_eq!(redirector.evaluate_url(TARGET), Decision::Canonical);
        assert_eq!(redirector.evaluate_url(&format!("{TARGET}/")), Decision::Canonical);

        let asin = Asin::parse("B08N5WRWNW").unwrap();
        for shape in all_shapes() {
            let url = format!("https://www.amazon.co.jp{}", shape.sample_path(&asin));
            let target = match redirector.evaluate_url(&url) {
                Decision::Redirect { target, .. } => target,
                Decision::Canonical => continue,
                other => panic!("{url}: {other:?}"),
            };
            assert_eq!(redirector.evaluate_url(&target), Decision::Canonical);
        }
    }

    #[test]
    fn test_redirect_carries_shape() {
        let decision =
            Redirector::default().evaluate_url("https://www.amazon.co.jp/o/ISBN=4774142204");
        match decision {
            Decision::Redirect { asin, shape, target } => {
                assert_eq!(asin.as_str(), "4774142204");
                assert_eq!(shape, ShapeId::OIsbnEq);
                assert_eq!(target, "https://www.amazon.co.jp/dp/4774142204");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_keep_query_policy() {
        let redirector = Redirector::new(RedirectConfig {
            query_policy: QueryPolicy::Keep,
            ..RedirectConfig::default()
        });
        assert_eq!(
            redirector.evaluate_url("https://www.amazon.co.jp/dp/B08N5WRWNW?psc=1"),
            Decision::Canonical
        );
        let legacy = "https://www.amazon.co.jp/gp/product/B08N5WRWNW?psc=1";
        assert_eq!(redirector.evaluate_url(legacy).target(), Some(TARGET));
    }

    #[test]
    fn test_gating() {
        let redirector = Redirector::default();
        let url = "https://www.amazon.co.jp/gp/product/B08N5WRWNW";

        let sub_frame = NavigationEvent {
            request_type: RequestType::SUB_FRAME,
            ..NavigationEvent::main_frame(url, 3)
        };
        assert_eq!(redirector.evaluate(&sub_frame), Decision::Ignored(IgnoreReason::ResourceType));

        let loading = NavigationEvent {
            status: NavStatus::Loading,
            ..NavigationEvent::main_frame(url, 3)
        };
        assert_eq!(redirector.evaluate(&loading), Decision::Ignored(IgnoreReason::NotComplete));

        let eager = Redirector::new(RedirectConfig {
            require_complete: false,
            ..RedirectConfig::default()
        });
        assert_eq!(eager.evaluate(&loading).target(), Some(TARGET));
    }

    #[test]
    fn test_ignored_reasons() {
        let redirector = Redirector::default();
        assert_eq!(
            redirector.evaluate_url("https://www.example.com/dp/B08N5WRWNW"),
            Decision::Ignored(IgnoreReason::ForeignHost)
        );
        assert_eq!(
            redirector.evaluate_url("not a url"),
            Decision::Ignored(IgnoreReason::Malformed)
        );
        assert_eq!(
            redirector.evaluate_url("https://www.amazon.co.jp/gp/cart/view.html"),
            Decision::Ignored(IgnoreReason::NotProductPage)
        );
    }

    #[test]
    fn test_other_hosts_redirect_to_storefront() {
        for url in [
            "https://amazon.co.jp/dp/B08N5WRWNW",
            "https://www.amazon.co.jp/dp/B08N5WRWNW#reviews",
        ] {
            assert_eq!(redirect_target(url).as_deref(), Some(TARGET), "{url}");
        }
    }

    #[test]
    fn test_idempotent() {
        let redirector = Redirector::default();
        let url = "https://www.amazon.co.jp/o/tg/detail/-/B08N5WRWNW";
        let first = redirector.evaluate_url(url);
        for _ in 0..3 {
            assert_eq!(redirector.evaluate_url(url), first);
        }
    }
}
