//! Ruleset verification
//!
//! A ruleset is accepted when it is exactly the table `build_ruleset`
//! produces for the config, and when the rule engine and the imperative
//! redirector agree on every URL of the sample corpus.

use std::collections::HashSet;

use asin_core::shape::LEGACY_SHAPES;
use asin_core::types::RequestType;
use asin_core::{Asin, QueryPolicy, RedirectConfig, Redirector};

use crate::builder::{build_ruleset, SUBSTITUTION};
use crate::engine::RuleEngine;
use crate::ruleset::{Rule, RulesetError};

/// Identifiers used to build the corpus.
const SAMPLE_ASINS: [&str; 2] = ["B08N5WRWNW", "4774142204"];

/// Suffixes appended to every legacy sample path.
const SAMPLE_SUFFIXES: [&str; 3] = ["", "/ref=sr_1_1", "?psc=1"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub rules: usize,
    pub samples: usize,
    pub redirects: usize,
}

/// URLs on which both mechanisms must agree.
///
/// Non-`www` hosts and `/dp/<id>/?query` are left out: the declarative rules
/// are anchored on `https://www.amazon.co.jp/` and only rewrite the bare
/// query form.
pub fn sample_corpus(policy: QueryPolicy) -> Vec<String> {
    let base = "https://www.amazon.co.jp";
    let mut urls = Vec::new();

    for id in SAMPLE_ASINS {
        let Ok(asin) = Asin::parse(id) else { continue };

        for shape in &LEGACY_SHAPES {
            let path = shape.sample_path(&asin);
            for suffix in SAMPLE_SUFFIXES {
                urls.push(format!("{base}{path}{suffix}"));
            }
        }

        urls.push(format!("{base}/dp/{asin}"));
        urls.push(format!("{base}/dp/{asin}/"));
        urls.push(format!("{base}/dp/{asin}?psc=1&th=1"));
        if policy == QueryPolicy::Keep {
            urls.push(format!("{base}/dp/{asin}/?psc=1"));
        }
        urls.push(format!("https://www.example.com/gp/product/{asin}"));

        let lower = id.to_ascii_lowercase();
        if lower != id {
            urls.push(format!("{base}/gp/product/{lower}"));
            urls.push(format!("{base}/Title/dp/{lower}"));
            urls.push(format!("{base}/dp/{lower}?psc=1"));
        }
    }

    urls.extend(
        [
            "https://www.amazon.co.jp/",
            "https://www.amazon.co.jp/s?k=rust",
            "https://www.amazon.co.jp/gp/cart/view.html",
            "https://www.amazon.co.jp/o/ASIN=B08N5WRWNW",
        ]
        .map(str::to_string),
    );

    urls
}

/// Check `rules` against the built-in table for `config`.
pub fn verify_ruleset(
    rules: &[Rule],
    config: &RedirectConfig,
) -> Result<VerifyReport, RulesetError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.id) {
            return Err(RulesetError::DuplicateId(rule.id));
        }
        match rule.regex_substitution() {
            Some(SUBSTITUTION) => {}
            other => {
                return Err(RulesetError::BadSubstitution {
                    id: rule.id,
                    found: other.unwrap_or_default().to_string(),
                })
            }
        }
    }

    let expected = build_ruleset(config);
    if rules.len() != expected.len() {
        return Err(RulesetError::CountMismatch {
            expected: expected.len(),
            found: rules.len(),
        });
    }

    for (index, (rule, want)) in rules.iter().zip(&expected).enumerate() {
        if rule != want {
            return Err(RulesetError::RuleMismatch { index, id: rule.id });
        }
    }

    let engine = RuleEngine::compile(rules)?;
    let redirector = Redirector::new(config.clone());
    let corpus = sample_corpus(config.query_policy);
    let mut redirects = 0usize;

    for url in &corpus {
        let by_rules = engine.apply(url, RequestType::MAIN_FRAME).map(|hit| hit.url);
        let by_redirector = redirector.evaluate_url(url).target().map(str::to_string);

        if by_rules != by_redirector {
            return Err(RulesetError::Divergence {
                url: url.clone(),
                rules: by_rules,
                redirector: by_redirector,
            });
        }
        if by_rules.is_some() {
            redirects += 1;
        }
    }

    log::debug!("verified {} rules over {} samples", rules.len(), corpus.len());

    Ok(VerifyReport {
        rules: rules.len(),
        samples: corpus.len(),
        redirects,
    })
}

#[cfg(test)]
mod tests {
    use asin_core::{QueryPolicy, RedirectConfig};

    use super::{sample_corpus, verify_ruleset};
    use crate::builder::build_ruleset;
    use crate::ruleset::RulesetError;

    #[test]
    fn built_ruleset_verifies() {
        let config = RedirectConfig::default();
        let report =
            verify_ruleset(&build_ruleset(&config), &config).expect("ruleset should verify");
        assert_eq!(report.rules, 14);
        assert_eq!(report.samples, sample_corpus(QueryPolicy::Strip).len());
        // 14 shapes x 3 suffixes + one query form, per identifier
        assert_eq!(report.redirects, 2 * (14 * 3 + 1));
    }

    #[test]
    fn keep_policy_verifies() {
        let config = RedirectConfig {
            query_policy: QueryPolicy::Keep,
            ..RedirectConfig::default()
        };
        let report =
            verify_ruleset(&build_ruleset(&config), &config).expect("ruleset should verify");
        assert_eq!(report.rules, 13);
        assert_eq!(report.redirects, 2 * 14 * 3);
    }

    #[test]
    fn detects_missing_rule() {
        let config = RedirectConfig::default();
        let mut rules = build_ruleset(&config);
        rules.pop();
        assert!(matches!(
            verify_ruleset(&rules, &config),
            Err(RulesetError::CountMismatch { expected: 14, found: 13 })
        ));
    }

    #[test]
    fn detects_reordering() {
        let config = RedirectConfig::default();
        let mut rules = build_ruleset(&config);
        rules.swap(0, 1);
        assert!(matches!(
            verify_ruleset(&rules, &config),
            Err(RulesetError::RuleMismatch { index: 0, id: 2 })
        ));
    }

    #[test]
    fn detects_duplicate_ids() {
        let config = RedirectConfig::default();
        let mut rules = build_ruleset(&config);
        rules[1].id = 1;
        assert!(matches!(verify_ruleset(&rules, &config), Err(RulesetError::DuplicateId(1))));
    }

    #[test]
    fn detects_bad_substitution() {
        let config = RedirectConfig::default();
        let mut rules = build_ruleset(&config);
        if let Some(redirect) = rules[3].action.redirect.as_mut() {
            redirect.regex_substitution =
                Some(r"https://www.amazon.co.jp/gp/product/\1".to_string());
        }
        assert!(matches!(
            verify_ruleset(&rules, &config),
            Err(RulesetError::BadSubstitution { id: 4, .. })
        ));
    }

    #[test]
    fn detects_case_insensitive_rules() {
        let config = RedirectConfig::default();
        let mut rules = build_ruleset(&config);
        rules[0].condition.is_url_filter_case_sensitive = None;
        assert!(matches!(
            verify_ruleset(&rules, &config),
            Err(RulesetError::RuleMismatch { index: 0, id: 1 })
        ));
    }

    #[test]
    fn corpus_covers_lowercase_identifiers() {
        let corpus = sample_corpus(QueryPolicy::Strip);
        assert!(corpus.contains(&"https://www.amazon.co.jp/gp/product/b08n5wrwnw".to_string()));
        assert!(corpus.contains(&"https://www.amazon.co.jp/dp/b08n5wrwnw?psc=1".to_string()));
    }
}
