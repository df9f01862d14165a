use asin_core::shape::{PatternOp, Shape, DP_FALLBACK, LEGACY_SHAPES};
use asin_core::{QueryPolicy, RedirectConfig};

use crate::ruleset::{Rule, RulesetUpdate};

/// Storefront origin as a regex.
pub const HOST_PATTERN: &str = r"https://www\.amazon\.co\.jp";

/// Every rule redirects to this.
pub const SUBSTITUTION: &str = r"https://www.amazon.co.jp/dp/\1";

const SEGMENT_PATTERN: &str = "[^/]+";
const CAPTURE_PATTERN: &str = "([A-Z0-9]{10})";

/// Compile the shape table into declarative rules.
///
/// Ids run 1..=N in table order and priorities run N..=1, so on overlap the
/// earlier shape wins, as it does in the extractor. Filters are marked
/// case-sensitive: identifiers are `[A-Z0-9]` only, and a lowercased one must
/// not be rewritten into a non-canonical target.
pub fn build_ruleset(config: &RedirectConfig) -> Vec<Rule> {
    let mut filters: Vec<String> = LEGACY_SHAPES
        .iter()
        .filter(|shape| shape.declarative)
        .map(|shape| format!("{}.*", regex_filter(shape)))
        .collect();

    if config.query_policy == QueryPolicy::Strip {
        filters.push(format!(r"{}\?.*", regex_filter(&DP_FALLBACK)));
    }

    let resource_types: Vec<String> = config
        .resource_types
        .names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let count = filters.len() as u32;
    let rules: Vec<Rule> = filters
        .into_iter()
        .zip(1u32..)
        .map(|(filter, id)| {
            Rule::regex_redirect(id, count + 1 - id, filter, SUBSTITUTION, resource_types.clone())
                .case_sensitive()
        })
        .collect();

    log::debug!("built {} declarative rules", rules.len());
    rules
}

/// Build the `updateDynamicRules` payload for `config`.
pub fn build_update(config: &RedirectConfig) -> RulesetUpdate {
    RulesetUpdate::replacing(build_ruleset(config))
}

/// Render a shape program as an RE2 pattern anchored on the storefront.
pub fn regex_filter(shape: &Shape) -> String {
    let mut out = String::from(HOST_PATTERN);
    for op in shape.program {
        match op {
            PatternOp::Lit(lit) => escape_into(&mut out, lit),
            PatternOp::Segment => out.push_str(SEGMENT_PATTERN),
            PatternOp::Capture => out.push_str(CAPTURE_PATTERN),
        }
    }
    out
}

/// Escape regex metacharacters. `-`, `/`, `=` and `%` stay as-is.
fn escape_into(out: &mut String, lit: &str) {
    for ch in lit.chars() {
        if matches!(
            ch,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
}
