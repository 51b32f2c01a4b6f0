//! Lookup of the anti-forgery token the server expects on mutating requests

use crate::{
    api::{CSRF_COOKIE, CSRF_FIELD},
    Dom,
};

/// Value of cookie `name` in a `document.cookie` string
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|c| c.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Token from the cookie, else from the submitted fields, else from any
/// hidden token field of the page
pub fn token<D: Dom>(dom: &D, fields: &[(String, String)]) -> Option<String> {
    if let Some(t) = cookie_value(&dom.cookies(), CSRF_COOKIE) {
        return Some(t);
    }
    if let Some((_, t)) = fields.iter().find(|(k, v)| k == CSRF_FIELD && !v.is_empty()) {
        return Some(t.clone());
    }
    dom.query(&format!("[name={CSRF_FIELD}]"))
        .and_then(|n| dom.value(&n))
        .filter(|v| !v.is_empty())
}
