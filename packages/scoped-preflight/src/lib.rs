#![deny(clippy::all)]

//! Scoped Preflight
//!
//! Rewrites the selectors of a baseline CSS reset so it applies only inside a
//! container, only outside of one, or only on a set of components, instead of
//! to the whole document.
//!
//! ```
//! use scoped_preflight::{IsolationStrategy, ScopedPreflight, ScopedPreflightConfig};
//!
//! let config = ScopedPreflightConfig::builder()
//!     .isolation_strategy(IsolationStrategy::inside_of_container(".tw", Default::default()))
//!     .build()
//!     .unwrap();
//! let plugin = ScopedPreflight::new(config, &ScopedPreflight::default_core_plugins()).unwrap();
//! let css = plugin.rewrite_css("body { margin: 0 } p { margin: 0 }").unwrap();
//! assert!(css.contains(".tw {"));
//! assert!(css.contains("p:where(.tw,.tw *) {"));
//! ```

// Stylesheet model
pub mod css_ast;
pub mod css_parser;
pub mod preflight;

// Scoping engine
pub mod declarations;
pub mod rewriter;
pub mod selectors;
pub mod strategies;

mod config;
mod error;

// Re-exports
pub use config::{CorePlugins, ScopedPreflight, ScopedPreflightConfig, ScopedPreflightConfigBuilder};
pub use css_ast::{AtRule, AtRuleBody, Comment, Declaration, Node, Rule, RuleChild, Stylesheet};
pub use css_parser::parse_stylesheet;
pub use declarations::{
    DeclarationContext, DeclarationHooks, ModifyOutcome, ModifyPreflightStyles, PropsFilter,
    SelectorSet, StyleOverrides,
};
pub use error::{ConfigError, Error, ParseError, Result};
pub use rewriter::{RewriteStats, Rewritten};
pub use selectors::{SelectorFilter, SelectorList, SelectorOutcome, ROOT_SELECTORS};
pub use strategies::{
    ForComponentsOptions, InsideOfContainerOptions, IsolationStrategy, LegacyMode,
    OutsideOfContainerOptions, RootStyles,
};
