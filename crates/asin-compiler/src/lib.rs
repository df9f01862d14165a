//! Amazon JP Redirector Rule Compiler
//!
//! This crate compiles the legacy shape table into declarativeNetRequest
//! redirect rules, and evaluates such rules for verification.

pub mod builder;
pub mod engine;
pub mod ruleset;
pub mod verify;

pub use builder::{build_ruleset, build_update};
pub use engine::{RuleEngine, RuleHit};
pub use ruleset::{parse_ruleset, Rule, RulesetError, RulesetUpdate};
pub use verify::{sample_corpus, verify_ruleset, VerifyReport};
