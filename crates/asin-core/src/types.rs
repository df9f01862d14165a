//! Core type definitions shared by the redirector, the rule compiler and
//! the bindings.

use crate::asin::Asin;
use crate::shape::ShapeId;

// =============================================================================
// Request Types (bit mask for resource filtering)
// =============================================================================

bitflags::bitflags! {
    /// Request type bit mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RequestType: u32 {
        const OTHER = 1 << 0;
        const SCRIPT = 1 << 1;
        const IMAGE = 1 << 2;
        const STYLESHEET = 1 << 3;
        const OBJECT = 1 << 4;
        const SUB_FRAME = 1 << 5;
        const MAIN_FRAME = 1 << 6;
        const XMLHTTPREQUEST = 1 << 7;
        const WEBSOCKET = 1 << 8;
        const FONT = 1 << 9;
        const MEDIA = 1 << 10;
        const PING = 1 << 11;

        /// Document types (main_frame + sub_frame)
        const DOCUMENT = Self::MAIN_FRAME.bits() | Self::SUB_FRAME.bits();
    }
}

/// Browser resource type names, in bit order.
const REQUEST_TYPE_NAMES: &[(&str, RequestType)] = &[
    ("other", RequestType::OTHER),
    ("script", RequestType::SCRIPT),
    ("image", RequestType::IMAGE),
    ("stylesheet", RequestType::STYLESHEET),
    ("object", RequestType::OBJECT),
    ("sub_frame", RequestType::SUB_FRAME),
    ("main_frame", RequestType::MAIN_FRAME),
    ("xmlhttprequest", RequestType::XMLHTTPREQUEST),
    ("websocket", RequestType::WEBSOCKET),
    ("font", RequestType::FONT),
    ("media", RequestType::MEDIA),
    ("ping", RequestType::PING),
];

impl RequestType {
    /// Parse a browser resource type string.
    /// Unknown names are `None`.
    pub fn from_browser_name(s: &str) -> Option<Self> {
        match s {
            "document" => Some(Self::MAIN_FRAME),
            "subdocument" => Some(Self::SUB_FRAME),
            _ => REQUEST_TYPE_NAMES
                .iter()
                .find(|(name, _)| *name == s)
                .map(|(_, ty)| *ty),
        }
    }

    /// Browser names of every bit set in this mask.
    pub fn names(self) -> Vec<&'static str> {
        REQUEST_TYPE_NAMES
            .iter()
            .filter(|(_, ty)| self.contains(*ty))
            .map(|(name, _)| *name)
            .collect()
    }
}

// =============================================================================
// Navigation Events
// =============================================================================

/// Load status reported with a navigation update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStatus {
    Loading,
    Complete,
}

impl NavStatus {
    /// Parse the browser status string. Anything but "complete" counts as loading.
    pub fn from_name(s: &str) -> Self {
        if s.eq_ignore_ascii_case("complete") {
            Self::Complete
        } else {
            Self::Loading
        }
    }
}

/// One observed navigation, as delivered by the host.
#[derive(Debug, Clone)]
pub struct NavigationEvent<'a> {
    /// Navigated URL
    pub url: &'a str,
    /// Load status
    pub status: NavStatus,
    /// Resource type of the request
    pub request_type: RequestType,
    /// Tab the navigation belongs to
    pub tab_id: i32,
}

impl<'a> NavigationEvent<'a> {
    /// A completed top-level navigation.
    pub fn main_frame(url: &'a str, tab_id: i32) -> Self {
        Self {
            url,
            status: NavStatus::Complete,
            request_type: RequestType::MAIN_FRAME,
            tab_id,
        }
    }
}

// =============================================================================
// Decisions
// =============================================================================

/// Why a navigation was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Resource type is not tracked
    ResourceType,
    /// Navigation has not completed yet
    NotComplete,
    /// URL could not be parsed
    Malformed,
    /// Host is not the storefront
    ForeignHost,
    /// No known shape matched
    NotProductPage,
}

impl IgnoreReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResourceType => "resource-type",
            Self::NotComplete => "not-complete",
            Self::Malformed => "malformed",
            Self::ForeignHost => "foreign-host",
            Self::NotProductPage => "not-product-page",
        }
    }
}

/// Outcome of evaluating one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to do
    Ignored(IgnoreReason),
    /// URL is already canonical
    Canonical,
    /// Navigate the tab to `target`
    Redirect {
        asin: Asin,
        shape: ShapeId,
        target: String,
    },
}

impl Decision {
    /// Redirect target, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Redirect { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Short label for logs and bindings.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Ignored(_) => "ignore",
            Self::Canonical => "canonical",
            Self::Redirect { .. } => "redirect",
        }
    }
}
