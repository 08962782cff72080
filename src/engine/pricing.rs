//! Point-price resolution.
//!
//! The price of one point comes from the template when it carries one.
//! Legacy sessions created before templates grew a price field encode it
//! in the session name instead ("Пятница, 50₽ за очко"), so the resolver
//! falls back to that pattern, then to the configured default.
//!
//! Resolution is read-through: callers invoke it on every recomputation so
//! a template correction made mid-game takes effect retroactively.

use crate::domain::{Rubles, Session, Template};
use regex::Regex;
use std::sync::OnceLock;

/// Default point price in rubles when nothing else resolves.
pub fn default_point_value() -> Rubles {
    Rubles::from_whole(10)
}

fn legacy_price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+(?:[.,]\d+)?)\s*₽\s*за\s*очко").expect("legacy price pattern is valid")
    })
}

/// Parse the legacy `<N>₽ за очко` price out of a free-text session name.
pub fn parse_legacy_price(name: &str) -> Option<Rubles> {
    let captures = legacy_price_pattern().captures(name)?;
    let raw = captures.get(1)?.as_str().replace(',', ".");
    Rubles::from_str_canonical(&raw).ok()
}

/// Resolve the ruble value of one point for a session.
pub fn resolve_point_value(
    session: &Session,
    template: Option<&Template>,
    default: Rubles,
) -> Rubles {
    if let Some(price) = template.and_then(|t| t.point_value_rubles) {
        return price;
    }
    if let Some(price) = parse_legacy_price(&session.name) {
        return price;
    }
    default
}
