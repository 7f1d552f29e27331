//! Configuration
//!
//! A [`ScopedPreflight`] is built once per build from a validated
//! [`ScopedPreflightConfig`] and is read-only afterwards, so one instance can
//! serve any number of rewrites, on any thread.

use serde::Deserialize;
use tracing::warn;

use crate::css_ast::{nodes_to_css, Node, Stylesheet};
use crate::css_parser::parse_stylesheet;
use crate::declarations::{DeclarationHooks, ModifyPreflightStyles, PropsFilter, StyleOverrides};
use crate::error::{ConfigError, Result};
use crate::preflight::baseline_stylesheet;
use crate::rewriter::{self, Rewritten};
use crate::selectors::{SelectorFilter, SelectorList};
use crate::strategies::{
    ForComponentsOptions, InsideOfContainerOptions, IsolationStrategy, LegacyMode, LegacyScope,
    OutsideOfContainerOptions, RootStyles,
};

/// The host build tool's own core plugin switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CorePlugins {
    /// The built-in, unscoped baseline reset.
    pub preflight: bool,
}

impl Default for CorePlugins {
    fn default() -> Self {
        CorePlugins { preflight: true }
    }
}

#[derive(Debug, Clone)]
pub struct ScopedPreflightConfig {
    pub isolation_strategy: IsolationStrategy,
    pub props_filter: Option<PropsFilter>,
    pub modify_preflight_styles: Option<ModifyPreflightStyles>,
}

impl ScopedPreflightConfig {
    pub fn builder() -> ScopedPreflightConfigBuilder {
        ScopedPreflightConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScopedPreflightConfigBuilder {
    isolation_strategy: Option<IsolationStrategy>,
    props_filter: Option<PropsFilter>,
    modify_preflight_styles: Option<ModifyPreflightStyles>,
}

impl ScopedPreflightConfigBuilder {
    pub fn isolation_strategy(mut self, strategy: IsolationStrategy) -> Self {
        self.isolation_strategy = Some(strategy);
        self
    }

    pub fn props_filter(mut self, filter: PropsFilter) -> Self {
        self.props_filter = Some(filter);
        self
    }

    pub fn modify_preflight_styles(mut self, modify: ModifyPreflightStyles) -> Self {
        self.modify_preflight_styles = Some(modify);
        self
    }

    pub fn build(self) -> std::result::Result<ScopedPreflightConfig, ConfigError> {
        let isolation_strategy = self
            .isolation_strategy
            .ok_or(ConfigError::MissingIsolationStrategy)?;
        Ok(ScopedPreflightConfig {
            isolation_strategy,
            props_filter: self.props_filter,
            modify_preflight_styles: self.modify_preflight_styles,
        })
    }
}

/// A validated scoping setup.
#[derive(Debug, Clone)]
pub struct ScopedPreflight {
    strategy: IsolationStrategy,
    hooks: DeclarationHooks,
}

impl ScopedPreflight {
    /// Core plugin switches this plugin contributes: the built-in reset off.
    pub fn default_core_plugins() -> CorePlugins {
        CorePlugins { preflight: false }
    }

    pub fn new(
        config: ScopedPreflightConfig,
        core_plugins: &CorePlugins,
    ) -> std::result::Result<Self, ConfigError> {
        config.isolation_strategy.validate()?;
        if core_plugins.preflight {
            return Err(ConfigError::PreflightNotDisabled);
        }
        if config.isolation_strategy.is_legacy() {
            warn!("cssSelector/mode is deprecated, use isolationStrategy instead");
        }
        if config.props_filter.is_some() {
            warn!("propsFilter is deprecated, use modifyPreflightStyles instead");
        }
        Ok(ScopedPreflight {
            strategy: config.isolation_strategy,
            hooks: DeclarationHooks {
                props_filter: config.props_filter,
                modify_preflight_styles: config.modify_preflight_styles,
            },
        })
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        let config: JsonConfig = serde_json::from_str(json)?;
        config.into_plugin()
    }

    pub fn from_json_value(value: serde_json::Value) -> std::result::Result<Self, ConfigError> {
        let config: JsonConfig = serde_json::from_value(value)?;
        config.into_plugin()
    }

    pub fn strategy(&self) -> &IsolationStrategy {
        &self.strategy
    }

    pub fn hooks(&self) -> &DeclarationHooks {
        &self.hooks
    }

    /// The selectors replacing `selector`; empty when it is removed.
    pub fn transform_selector(&self, selector: &str) -> SelectorList {
        self.strategy.apply(selector)
    }

    pub fn rewrite(&self, stylesheet: Stylesheet) -> Vec<Node> {
        rewriter::rewrite(stylesheet, self)
    }

    pub fn rewrite_with_stats(&self, stylesheet: Stylesheet) -> Rewritten {
        rewriter::rewrite_with_stats(stylesheet, self)
    }

    /// Parse, rewrite and serialize stylesheet text.
    pub fn rewrite_css(&self, css: &str) -> Result<String> {
        let stylesheet = parse_stylesheet(css)?;
        Ok(nodes_to_css(&self.rewrite(stylesheet)))
    }

    /// The embedded baseline reset, scoped.
    pub fn rewrite_baseline(&self) -> String {
        nodes_to_css(&self.rewrite(baseline_stylesheet()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum StrategyConfig {
    InsideOfContainer {
        #[serde(default)]
        selectors: OneOrMany,
        #[serde(default)]
        ignore: Vec<String>,
        #[serde(default)]
        remove: Vec<String>,
        #[serde(default)]
        except: Option<String>,
        #[serde(default, rename = "rootStyles")]
        root_styles: RootStyles,
    },
    OutsideOfContainer {
        #[serde(default)]
        selectors: OneOrMany,
        #[serde(default)]
        ignore: Vec<String>,
        #[serde(default)]
        remove: Vec<String>,
        #[serde(default)]
        plus: Option<String>,
    },
    ForComponents {
        #[serde(default)]
        selectors: OneOrMany,
        #[serde(default)]
        ignore: Vec<String>,
        #[serde(default)]
        remove: Vec<String>,
    },
}

impl From<StrategyConfig> for IsolationStrategy {
    fn from(config: StrategyConfig) -> Self {
        match config {
            StrategyConfig::InsideOfContainer {
                selectors,
                ignore,
                remove,
                except,
                root_styles,
            } => IsolationStrategy::inside_of_container(
                Vec::from(selectors),
                InsideOfContainerOptions {
                    ignore,
                    remove,
                    except,
                    root_styles,
                },
            ),
            StrategyConfig::OutsideOfContainer {
                selectors,
                ignore,
                remove,
                plus,
            } => IsolationStrategy::outside_of_container(
                Vec::from(selectors),
                OutsideOfContainerOptions { ignore, remove, plus },
            ),
            StrategyConfig::ForComponents {
                selectors,
                ignore,
                remove,
            } => IsolationStrategy::for_components(
                Vec::from(selectors),
                ForComponentsOptions { ignore, remove },
            ),
        }
    }
}

/// The JSON shape of a configuration file. Unknown keys are left to the
/// caller (the CLI reads `output` from the same document).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonConfig {
    isolation_strategy: Option<StrategyConfig>,
    css_selector: Option<String>,
    mode: Option<LegacyMode>,
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    remove: Vec<String>,
    modify_preflight_styles: Option<StyleOverrides>,
    core_plugins: Option<CorePlugins>,
}

impl JsonConfig {
    fn into_plugin(self) -> std::result::Result<ScopedPreflight, ConfigError> {
        let strategy = match (self.isolation_strategy, self.css_selector) {
            (Some(strategy), _) => IsolationStrategy::from(strategy),
            (None, Some(css_selector)) => IsolationStrategy::Legacy(LegacyScope::new(
                css_selector,
                self.mode.unwrap_or_default(),
                SelectorFilter::new(self.ignore, self.remove),
            )),
            (None, None) => return Err(ConfigError::MissingIsolationStrategy),
        };

        let mut builder = ScopedPreflightConfig::builder().isolation_strategy(strategy);
        if let Some(overrides) = self.modify_preflight_styles {
            builder = builder.modify_preflight_styles(ModifyPreflightStyles::map(overrides));
        }
        let core_plugins = self
            .core_plugins
            .unwrap_or_else(ScopedPreflight::default_core_plugins);
        ScopedPreflight::new(builder.build()?, &core_plugins)
    }
}
