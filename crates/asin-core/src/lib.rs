//! Amazon JP Redirector Core Library
//!
//! Normalizes legacy Amazon Japan product URLs into the canonical
//! `https://www.amazon.co.jp/dp/<ASIN>` form.
//!
//! # Architecture
//!
//! A static, ordered table of legacy path shapes is searched against each
//! navigated URL. The first shape that captures an identifier wins and the
//! canonical URL is rebuilt from it. URLs that are already canonical are left
//! alone, which is what keeps redirects from looping.
//!
//! # Modules
//!
//! - `asin`: Validated identifier type
//! - `url`: URL slicing
//! - `shape`: Legacy shape table and matcher
//! - `canonical`: Canonical checker and builder
//! - `extract`: Identifier extraction with domain guard
//! - `redirect`: Per-navigation orchestration
//! - `config`: Redirector settings
//! - `types`: Shared type definitions

pub mod asin;
pub mod canonical;
pub mod config;
pub mod extract;
pub mod redirect;
pub mod shape;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use asin::{Asin, AsinError};
pub use canonical::{build_canonical_url, is_canonical, is_canonical_with, QueryPolicy};
pub use config::{ConfigError, RedirectConfig};
pub use extract::{extract_asin, extract_with_shape};
pub use redirect::Redirector;
pub use shape::{Shape, ShapeId, LEGACY_SHAPES};
pub use types::{Decision, IgnoreReason, NavStatus, NavigationEvent, RequestType};
