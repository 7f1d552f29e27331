//! Isolation strategies
//!
//! Each strategy rewrites a single baseline selector so the reset only
//! reaches a region of the document. All scoping conditions are wrapped in
//! `:where()`, which adds no specificity, so the rewritten rules keep the
//! cascade weight of the original reset.
//!
//! - [`IsolationStrategy::inside_of_container`]: only inside the container(s)
//! - [`IsolationStrategy::outside_of_container`]: everywhere except inside the container(s)
//! - [`IsolationStrategy::for_components`]: on the component elements and their descendants
//! - [`IsolationStrategy::legacy`]: the single `cssSelector` + `mode` API of the first release
//! - [`IsolationStrategy::custom`]: any closure

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::selectors::{
    is_root_selector, IntoSelectors, SelectorFilter, SelectorList, SelectorOutcome,
};

/// What happens to `html`, `body` and `:host` rules under [`InsideOfContainer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RootStyles {
    /// Replace the root selector with the container selector(s).
    #[default]
    #[serde(rename = "move to container")]
    MoveToContainer,
    /// Keep the root selector and append ` :where(containers)`.
    #[serde(rename = "add :where")]
    AddWhere,
}

/// Modes of the deprecated single-selector API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LegacyMode {
    #[default]
    #[serde(rename = "matched only")]
    MatchedOnly,
    #[serde(rename = "under matched")]
    UnderMatched,
    #[serde(rename = "except matched")]
    ExceptMatched,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsideOfContainerOptions {
    pub ignore: Vec<String>,
    pub remove: Vec<String>,
    /// A region inside the container the reset must not reach.
    pub except: Option<String>,
    pub root_styles: RootStyles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutsideOfContainerOptions {
    pub ignore: Vec<String>,
    pub remove: Vec<String>,
    /// A region inside the container(s) that gets the reset back.
    pub plus: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForComponentsOptions {
    pub ignore: Vec<String>,
    pub remove: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn with_descendants(selectors: &[String]) -> String {
    selectors
        .iter()
        .map(|s| format!("{},{} *", s, s))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone)]
pub struct InsideOfContainer {
    containers: Vec<String>,
    filter: SelectorFilter,
    root_styles: RootStyles,
    where_not_except: String,
}

impl InsideOfContainer {
    pub fn new(containers: impl IntoSelectors, options: InsideOfContainerOptions) -> Self {
        let where_not_except = match non_empty(options.except) {
            Some(except) => format!(":where(:not({},{} *))", except, except),
            None => String::new(),
        };
        InsideOfContainer {
            containers: containers.into_selectors(),
            filter: SelectorFilter::new(options.ignore, options.remove),
            root_styles: options.root_styles,
            where_not_except,
        }
    }

    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    fn scope(&self, selector: &str) -> SelectorList {
        let wne = &self.where_not_except;
        if is_root_selector(selector) {
            match self.root_styles {
                RootStyles::MoveToContainer => self
                    .containers
                    .iter()
                    .map(|c| format!("{}{}", c, wne))
                    .collect(),
                RootStyles::AddWhere => smallvec::smallvec![format!(
                    "{} :where({}){}",
                    selector,
                    self.containers.join(","),
                    wne
                )],
            }
        } else {
            self.containers
                .iter()
                .map(|c| format!("{}:where({},{} *){}", selector, c, c, wne))
                .collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutsideOfContainer {
    containers: Vec<String>,
    filter: SelectorFilter,
    where_not_containers: String,
    plus: Option<InsideOfContainer>,
}

impl OutsideOfContainer {
    pub fn new(containers: impl IntoSelectors, options: OutsideOfContainerOptions) -> Self {
        let containers = containers.into_selectors();
        let where_not_containers = format!(":where(:not({}))", with_descendants(&containers));
        let plus = non_empty(options.plus)
            .map(|plus| InsideOfContainer::new(plus, InsideOfContainerOptions::default()));
        OutsideOfContainer {
            containers,
            filter: SelectorFilter::new(options.ignore, options.remove),
            where_not_containers,
            plus,
        }
    }

    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    fn scope(&self, selector: &str) -> Option<SelectorList> {
        // the document root is outside of every container
        if is_root_selector(selector) {
            return None;
        }
        let mut scoped: SelectorList =
            smallvec::smallvec![format!("{}{}", selector, self.where_not_containers)];
        if let Some(plus) = &self.plus {
            scoped.extend(plus.scope(selector));
        }
        Some(scoped)
    }
}

#[derive(Debug, Clone)]
pub struct ForComponents {
    components: Vec<String>,
    filter: SelectorFilter,
    where_direct: String,
    where_with_descendants: String,
}

impl ForComponents {
    pub fn new(components: impl IntoSelectors, options: ForComponentsOptions) -> Self {
        let components = components.into_selectors();
        ForComponents {
            where_direct: format!(":where({})", components.join(",")),
            where_with_descendants: format!(":where({})", with_descendants(&components)),
            components,
            filter: SelectorFilter::new(options.ignore, options.remove),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    fn scope(&self, selector: &str) -> String {
        // roots can't be a component, so only what is under them is targeted
        if is_root_selector(selector) {
            format!("{} {}", selector, self.where_direct)
        } else {
            format!("{}{}", selector, self.where_with_descendants)
        }
    }
}

#[derive(Debug, Clone)]
pub struct LegacyScope {
    css_selector: String,
    mode: LegacyMode,
    filter: SelectorFilter,
}

impl LegacyScope {
    pub fn new(css_selector: impl Into<String>, mode: LegacyMode, filter: SelectorFilter) -> Self {
        LegacyScope {
            css_selector: css_selector.into(),
            mode,
            filter,
        }
    }

    pub fn css_selector(&self) -> &str {
        &self.css_selector
    }

    pub fn mode(&self) -> LegacyMode {
        self.mode
    }

    fn scope(&self, selector: &str) -> String {
        let c = &self.css_selector;
        match self.mode {
            LegacyMode::ExceptMatched => format!("{}:where(:not({} *))", selector, c),
            LegacyMode::UnderMatched if is_root_selector(selector) => c.clone(),
            LegacyMode::UnderMatched | LegacyMode::MatchedOnly => {
                format!("{}:where({},{} *)", selector, c, c)
            }
        }
    }
}

pub type TransformFn = dyn Fn(&str) -> Option<SelectorOutcome> + Send + Sync;

/// A user supplied transformer. Returning `None` leaves the selector
/// unhandled, which the rewriter treats as removal.
#[derive(Clone)]
pub struct CustomTransformer(Arc<TransformFn>);

impl CustomTransformer {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&str) -> Option<SelectorOutcome> + Send + Sync + 'static,
    {
        CustomTransformer(Arc::new(transform))
    }
}

impl fmt::Debug for CustomTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomTransformer(..)")
    }
}

#[derive(Debug, Clone)]
pub enum IsolationStrategy {
    InsideOfContainer(InsideOfContainer),
    OutsideOfContainer(OutsideOfContainer),
    ForComponents(ForComponents),
    Legacy(LegacyScope),
    Custom(CustomTransformer),
}

impl IsolationStrategy {
    /// Isolates the reset inside of the container(s), assuming all the
    /// styled content lives in there.
    ///
    /// ```
    /// use scoped_preflight::{IsolationStrategy, InsideOfContainerOptions, SelectorOutcome};
    ///
    /// let strategy = IsolationStrategy::inside_of_container(
    ///     ".tw",
    ///     InsideOfContainerOptions { except: Some(".no-tw".into()), ..Default::default() },
    /// );
    /// assert_eq!(
    ///     strategy.transform("button"),
    ///     Some(SelectorOutcome::replaced("button:where(.tw,.tw *):where(:not(.no-tw,.no-tw *))")),
    /// );
    /// ```
    pub fn inside_of_container(
        containers: impl IntoSelectors,
        options: InsideOfContainerOptions,
    ) -> Self {
        IsolationStrategy::InsideOfContainer(InsideOfContainer::new(containers, options))
    }

    /// Isolates the reset outside of the container(s), assuming nothing
    /// inside them wants it.
    pub fn outside_of_container(
        containers: impl IntoSelectors,
        options: OutsideOfContainerOptions,
    ) -> Self {
        IsolationStrategy::OutsideOfContainer(OutsideOfContainer::new(containers, options))
    }

    /// Isolates the reset on the component elements themselves and
    /// everything below them.
    pub fn for_components(components: impl IntoSelectors, options: ForComponentsOptions) -> Self {
        IsolationStrategy::ForComponents(ForComponents::new(components, options))
    }

    /// The original `cssSelector` + `mode` configuration. Deprecated.
    pub fn legacy(css_selector: impl Into<String>, mode: LegacyMode) -> Self {
        IsolationStrategy::Legacy(LegacyScope::new(
            css_selector,
            mode,
            SelectorFilter::default(),
        ))
    }

    /// Pre-bundled `matchedOnly` helper of the first release. Deprecated.
    pub fn matched_only(css_selector: impl Into<String>, filter: SelectorFilter) -> Self {
        IsolationStrategy::Legacy(LegacyScope::new(css_selector, LegacyMode::MatchedOnly, filter))
    }

    /// Pre-bundled `exceptMatched` helper of the first release. Deprecated.
    pub fn except_matched(css_selector: impl Into<String>, filter: SelectorFilter) -> Self {
        IsolationStrategy::Legacy(LegacyScope::new(
            css_selector,
            LegacyMode::ExceptMatched,
            filter,
        ))
    }

    pub fn custom<F>(transform: F) -> Self
    where
        F: Fn(&str) -> Option<SelectorOutcome> + Send + Sync + 'static,
    {
        IsolationStrategy::Custom(CustomTransformer::new(transform))
    }

    pub fn name(&self) -> &'static str {
        match self {
            IsolationStrategy::InsideOfContainer(_) => "insideOfContainer",
            IsolationStrategy::OutsideOfContainer(_) => "outsideOfContainer",
            IsolationStrategy::ForComponents(_) => "forComponents",
            IsolationStrategy::Legacy(_) => "cssSelector",
            IsolationStrategy::Custom(_) => "custom",
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, IsolationStrategy::Legacy(_))
    }

    /// Rejects strategies without a usable boundary selector.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let selectors: &[String] = match self {
            IsolationStrategy::InsideOfContainer(s) => &s.containers,
            IsolationStrategy::OutsideOfContainer(s) => &s.containers,
            IsolationStrategy::ForComponents(s) => &s.components,
            IsolationStrategy::Legacy(s) => std::slice::from_ref(&s.css_selector),
            IsolationStrategy::Custom(_) => return Ok(()),
        };
        if selectors.is_empty() || selectors.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::EmptySelector {
                strategy: self.name(),
            });
        }
        Ok(())
    }

    /// Transforms one original selector. `None` means unhandled, which only a
    /// custom transformer can answer.
    pub fn transform(&self, selector: &str) -> Option<SelectorOutcome> {
        match self {
            IsolationStrategy::InsideOfContainer(s) => s
                .filter
                .resolve(selector)
                .or_else(|| Some(SelectorOutcome::Replaced(s.scope(selector)))),
            IsolationStrategy::OutsideOfContainer(s) => s.filter.resolve(selector).or_else(|| {
                Some(match s.scope(selector) {
                    Some(scoped) => SelectorOutcome::Replaced(scoped),
                    None => SelectorOutcome::Unchanged,
                })
            }),
            IsolationStrategy::ForComponents(s) => s
                .filter
                .resolve(selector)
                .or_else(|| Some(SelectorOutcome::replaced(s.scope(selector)))),
            IsolationStrategy::Legacy(s) => s
                .filter
                .resolve(selector)
                .or_else(|| Some(SelectorOutcome::replaced(s.scope(selector)))),
            IsolationStrategy::Custom(custom) => (custom.0)(selector),
        }
    }

    /// The selectors that replace `selector` on its rule; empty when removed.
    pub fn apply(&self, selector: &str) -> SelectorList {
        self.transform(selector)
            .unwrap_or(SelectorOutcome::Removed)
            .into_selectors(selector)
    }
}
