//! Baseline stylesheet
//!
//! The Tailwind v3 preflight reset, embedded at build time.

use crate::css_ast::Stylesheet;
use crate::css_parser::parse_stylesheet;
use once_cell::sync::Lazy;

pub const PREFLIGHT_CSS: &str = include_str!("preflight.css");

static BASELINE: Lazy<Stylesheet> = Lazy::new(|| {
    parse_stylesheet(PREFLIGHT_CSS).expect("embedded preflight stylesheet must parse")
});

/// A fresh copy of the parsed baseline stylesheet, ready to be rewritten.
pub fn baseline_stylesheet() -> Stylesheet {
    BASELINE.clone()
}
