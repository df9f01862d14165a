//! Declarative rule evaluation
//!
//! Applies a ruleset the way the browser's declarativeNetRequest engine
//! does: the highest-priority matching rule wins (lowest id on ties), and
//! the first match of its `regexFilter` is replaced by `regexSubstitution`.
//! Filters match case-insensitively unless `isUrlFilterCaseSensitive` is set.

use regex::{Regex, RegexBuilder};

use asin_core::types::RequestType;

use crate::ruleset::{ActionType, Rule, RulesetError};

struct CompiledRule {
    id: u32,
    priority: u32,
    regex: Regex,
    /// Substitution in `regex` crate syntax (`${1}`)
    replacement: String,
    resource_types: RequestType,
}

/// A rule that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub rule_id: u32,
    pub url: String,
}

/// Compiled ruleset.
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// Compile every rule. Only regex redirect rules are supported.
    pub fn compile(rules: &[Rule]) -> Result<Self, RulesetError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let parts = (rule.action.kind, rule.regex_filter(), rule.regex_substitution());
            let (filter, substitution) = match parts {
                (ActionType::Redirect, Some(filter), Some(substitution)) => (filter, substitution),
                _ => return Err(RulesetError::Unsupported(rule.id)),
            };

            let regex = RegexBuilder::new(filter)
                .case_insensitive(!rule.is_case_sensitive())
                .build()
                .map_err(|source| RulesetError::Regex { id: rule.id, source })?;

            compiled.push(CompiledRule {
                id: rule.id,
                priority: rule.priority,
                regex,
                replacement: convert_substitution(substitution),
                resource_types: parse_resource_types(rule)?,
            });
        }

        compiled.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

        Ok(Self { rules: compiled })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the ruleset to a request.
    pub fn apply(&self, url: &str, request_type: RequestType) -> Option<RuleHit> {
        let rule = self
            .rules
            .iter()
            .filter(|rule| rule.resource_types.intersects(request_type))
            .find(|rule| rule.regex.is_match(url))?;

        let rewritten = rule.regex.replace(url, rule.replacement.as_str());
        Some(RuleHit {
            rule_id: rule.id,
            url: rewritten.into_owned(),
        })
    }
}

/// No resourceTypes means every type except main_frame.
fn parse_resource_types(rule: &Rule) -> Result<RequestType, RulesetError> {
    if rule.condition.resource_types.is_empty() {
        return Ok(RequestType::all() - RequestType::MAIN_FRAME);
    }

    let mut mask = RequestType::empty();
    for name in &rule.condition.resource_types {
        mask |= RequestType::from_browser_name(name).ok_or_else(|| {
            RulesetError::UnknownResourceType {
                id: rule.id,
                name: name.clone(),
            }
        })?;
    }
    Ok(mask)
}

/// `\1` becomes `${1}`, literal `$` becomes `$$`.
fn convert_substitution(substitution: &str) -> String {
    let mut out = String::with_capacity(substitution.len() + 8);
    let mut chars = substitution.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    chars.next();
                    out.push_str("${");
                    out.push(d);
                    out.push('}');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            '$' => out.push_str("$$"),
            _ => out.push(ch),
        }
    }

    out
}
