//! WebAssembly bindings for the Amazon JP redirector
//!
//! The background script calls `init` once at startup, then forwards every
//! tab update to `on_navigation` and applies the returned redirect.

mod logger;

use std::sync::OnceLock;

use asin_compiler::build_update;
use asin_core::types::{Decision, NavStatus, NavigationEvent, RequestType};
use asin_core::{build_canonical_url, is_canonical_with, Asin, RedirectConfig, Redirector};
use log::LevelFilter;
use wasm_bindgen::prelude::*;

static REDIRECTOR: OnceLock<Redirector> = OnceLock::new();

#[wasm_bindgen]
pub fn init(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);

    if REDIRECTOR.get().is_some() {
        return Err(JsValue::from_str("Already initialized. Reload the extension to reinitialize."));
    }

    let config = match config_json.as_deref() {
        Some(text) => RedirectConfig::from_json(text)
            .map_err(|e| JsValue::from_str(&format!("Failed to load config: {}", e)))?,
        None => RedirectConfig::default(),
    };

    REDIRECTOR
        .set(Redirector::new(config))
        .map_err(|_| JsValue::from_str("Failed to set redirector state"))?;

    log::info!("redirector initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    REDIRECTOR.get().is_some()
}

/// Switch console logging between debug and info.
#[wasm_bindgen]
pub fn set_debug_logging(enabled: bool) {
    logger::init(if enabled { LevelFilter::Debug } else { LevelFilter::Info });
}

#[wasm_bindgen]
pub fn on_navigation(url: &str, status: &str, request_type: &str, tab_id: i32) -> JsValue {
    let result = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&result, &"tabId".into(), &JsValue::from(tab_id));

    let redirector = match REDIRECTOR.get() {
        Some(redirector) => redirector,
        None => {
            set_field(&result, "action", "ignore");
            set_field(&result, "reason", "uninitialized");
            return result.into();
        }
    };

    let event = NavigationEvent {
        url,
        status: NavStatus::from_name(status),
        request_type: RequestType::from_browser_name(request_type)
            .unwrap_or(RequestType::OTHER),
        tab_id,
    };

    let decision = redirector.evaluate(&event);
    set_field(&result, "action", decision.action());

    match decision {
        Decision::Redirect { asin, shape, target } => {
            set_field(&result, "redirectUrl", &target);
            set_field(&result, "asin", asin.as_str());
            set_field(&result, "shape", shape.as_str());
        }
        Decision::Ignored(reason) => {
            set_field(&result, "reason", reason.as_str());
        }
        Decision::Canonical => {}
    }

    result.into()
}

fn set_field(obj: &js_sys::Object, key: &str, value: &str) {
    let _ = js_sys::Reflect::set(obj, &JsValue::from_str(key), &JsValue::from_str(value));
}

#[wasm_bindgen]
pub fn is_canonical_url(url: &str) -> bool {
    let policy = REDIRECTOR
        .get()
        .map(|redirector| redirector.config().query_policy)
        .unwrap_or_default();
    is_canonical_with(url, policy)
}

#[wasm_bindgen]
pub fn extract_asin(url: &str) -> Option<String> {
    asin_core::extract_asin(url).map(|asin| asin.to_string())
}

#[wasm_bindgen]
pub fn canonical_url(asin: &str) -> Result<String, JsValue> {
    let asin = Asin::parse(asin).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(build_canonical_url(&asin))
}

/// JSON payload for `chrome.declarativeNetRequest.updateDynamicRules`.
#[wasm_bindgen]
pub fn dynamic_rules_update() -> Result<String, JsValue> {
    let config = REDIRECTOR
        .get()
        .map(|redirector| redirector.config().clone())
        .unwrap_or_default();
    serde_json::to_string(&build_update(&config))
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize rules: {}", e)))
}
