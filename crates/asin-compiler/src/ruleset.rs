//! declarativeNetRequest rule types
//!
//! These mirror the JSON accepted by `chrome.declarativeNetRequest`, so a
//! serialized ruleset can be handed to `updateDynamicRules` as-is.

use serde::{Deserialize, Serialize};

/// Error type for ruleset loading, compilation and verification.
#[derive(Debug, thiserror::Error)]
pub enum RulesetError {
    #[error("Invalid ruleset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rule {id}: invalid regexFilter: {source}")]
    Regex {
        id: u32,
        #[source]
        source: regex::Error,
    },
    #[error("Rule {0}: only redirect rules with regexFilter and regexSubstitution are supported")]
    Unsupported(u32),
    #[error("Rule {id}: unknown resource type {name:?}")]
    UnknownResourceType { id: u32, name: String },
    #[error("Duplicate rule id {0}")]
    DuplicateId(u32),
    #[error("Expected {expected} rules, found {found}")]
    CountMismatch { expected: usize, found: usize },
    #[error("Rule {id}: substitution {found:?} does not match template")]
    BadSubstitution { id: u32, found: String },
    #[error("Rule at position {index} (id {id}) differs from the built-in table")]
    RuleMismatch { index: usize, id: u32 },
    #[error("Rules and redirector disagree on {url}: rules={rules:?}, redirector={redirector:?}")]
    Divergence {
        url: String,
        rules: Option<String>,
        redirector: Option<String>,
    },
}

/// One declarative rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: u32,
    #[serde(default = "default_priority")]
    pub priority: u32,
    pub action: RuleAction,
    pub condition: RuleCondition,
}

fn default_priority() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Block,
    Redirect,
    Allow,
    UpgradeScheme,
    ModifyHeaders,
    AllowAllRequests,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub kind: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_substitution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_filter: Option<String>,
    /// Browser default is `false`: filters match case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_url_filter_case_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_types: Vec<String>,
}

impl Rule {
    /// A regex redirect rule.
    pub fn regex_redirect(
        id: u32,
        priority: u32,
        filter: String,
        substitution: &str,
        resource_types: Vec<String>,
    ) -> Self {
        Self {
            id,
            priority,
            action: RuleAction {
                kind: ActionType::Redirect,
                redirect: Some(Redirect {
                    regex_substitution: Some(substitution.to_string()),
                    url: None,
                }),
            },
            condition: RuleCondition {
                regex_filter: Some(filter),
                is_url_filter_case_sensitive: None,
                resource_types,
            },
        }
    }

    /// Match `regexFilter` case-sensitively.
    pub fn case_sensitive(mut self) -> Self {
        self.condition.is_url_filter_case_sensitive = Some(true);
        self
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.condition.is_url_filter_case_sensitive.unwrap_or(false)
    }

    pub fn regex_filter(&self) -> Option<&str> {
        self.condition.regex_filter.as_deref()
    }

    pub fn regex_substitution(&self) -> Option<&str> {
        self.action.redirect.as_ref()?.regex_substitution.as_deref()
    }
}

/// Payload for `updateDynamicRules`: drop every id we are about to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetUpdate {
    pub remove_rule_ids: Vec<u32>,
    pub add_rules: Vec<Rule>,
}

impl RulesetUpdate {
    pub fn replacing(rules: Vec<Rule>) -> Self {
        Self {
            remove_rule_ids: rules.iter().map(|rule| rule.id).collect(),
            add_rules: rules,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RulesetDocument {
    Rules(Vec<Rule>),
    Update(RulesetUpdate),
}

/// Parse either a bare rule array or an `updateDynamicRules` payload.
pub fn parse_ruleset(text: &str) -> Result<Vec<Rule>, RulesetError> {
    let doc: RulesetDocument = serde_json::from_str(text)?;
    Ok(match doc {
        RulesetDocument::Rules(rules) => rules,
        RulesetDocument::Update(update) => update.add_rules,
    })
}
