//! Shared helpers for the integration suites

#![allow(dead_code)]

use regex::Regex;
use scoped_preflight::{
    CorePlugins, IsolationStrategy, ModifyPreflightStyles, ScopedPreflight, ScopedPreflightConfig,
};

pub fn plugin(strategy: IsolationStrategy) -> ScopedPreflight {
    plugin_with(strategy, None)
}

pub fn plugin_with(
    strategy: IsolationStrategy,
    modify: Option<ModifyPreflightStyles>,
) -> ScopedPreflight {
    let mut builder = ScopedPreflightConfig::builder().isolation_strategy(strategy);
    if let Some(modify) = modify {
        builder = builder.modify_preflight_styles(modify);
    }
    ScopedPreflight::new(builder.build().unwrap(), &disabled_core_preflight()).unwrap()
}

pub fn disabled_core_preflight() -> CorePlugins {
    ScopedPreflight::default_core_plugins()
}

/// Every selector `selector` turns into, in order.
pub fn transformed(strategy: &IsolationStrategy, selector: &str) -> Vec<String> {
    strategy.apply(selector).into_vec()
}

pub fn extract_css_content(css: &str) -> String {
    let re1 = Regex::new(r"\s+").unwrap();
    let re2 = Regex::new(r":\s").unwrap();
    let re3 = Regex::new(r",\s").unwrap();
    let re4 = Regex::new(r"\{\s+").unwrap();
    let re5 = Regex::new(r"\s+\}").unwrap();
    let re6 = Regex::new(r"\s*\{").unwrap();

    let mut result = re1.replace_all(css, " ").to_string();
    result = re2.replace_all(&result, ":").to_string();
    result = re3.replace_all(&result, ",").to_string();
    result = re4.replace_all(&result, "{").to_string();
    result = re5.replace_all(&result, "}").to_string();
    result = re6.replace_all(&result, "{").to_string();
    result.trim().to_string()
}

pub fn assert_equal_css(actual: &str, expected: &str) {
    let actual_css = extract_css_content(actual);
    let expected_css = extract_css_content(expected);
    assert_eq!(
        actual_css, expected_css,
        "Expected '{}' to equal '{}'",
        actual_css, expected_css
    );
}

pub fn assert_contains(actual: &str, expected: &str) {
    assert!(
        actual.contains(expected),
        "Expected '{}' to contain '{}'",
        actual,
        expected
    );
}

pub fn assert_not_contains(actual: &str, expected: &str) {
    assert!(
        !actual.contains(expected),
        "Expected '{}' to not contain '{}'",
        actual,
        expected
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_css_content() {
        let css = "  \n  a,\n  b {\n  color: red;\n}  \n  ";
        assert_eq!(extract_css_content(css), "a,b{color:red;}");
    }
}
