//! Declaration hooks
//!
//! Optional per-property hooks run on every declaration of every rule before
//! its selectors are rewritten. A declaration can keep its value, get a new
//! one, or be removed. Removed declarations stay in the rule as inert
//! comments carrying their text.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::css_ast::{Declaration, Rule, RuleChild};

/// All the original selectors of the rule a declaration belongs to.
pub type SelectorSet = HashSet<String>;

/// `selector -> property -> new value`; a `None` value removes the property.
pub type StyleOverrides = IndexMap<String, IndexMap<String, Option<String>>>;

#[derive(Debug, Clone, Copy)]
pub struct DeclarationContext<'a> {
    pub selector_set: &'a SelectorSet,
    pub property: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyOutcome {
    Unchanged,
    Replace(String),
    Remove,
}

pub type PropsFilterFn = dyn Fn(&DeclarationContext<'_>) -> bool + Send + Sync;
pub type ModifyFn = dyn Fn(&DeclarationContext<'_>) -> ModifyOutcome + Send + Sync;

/// Deprecated property filter: returning `false` removes the declaration.
#[derive(Clone)]
pub struct PropsFilter(Arc<PropsFilterFn>);

impl PropsFilter {
    pub fn new<F>(filter: F) -> Self
    where
        F: Fn(&DeclarationContext<'_>) -> bool + Send + Sync + 'static,
    {
        PropsFilter(Arc::new(filter))
    }

    pub fn keep(&self, ctx: &DeclarationContext<'_>) -> bool {
        (self.0)(ctx)
    }
}

impl fmt::Debug for PropsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PropsFilter(..)")
    }
}

#[derive(Clone)]
pub enum ModifyPreflightStyles {
    Hook(Arc<ModifyFn>),
    /// The first selector key present on the rule wins; keys are never merged.
    Map(StyleOverrides),
}

impl ModifyPreflightStyles {
    pub fn hook<F>(hook: F) -> Self
    where
        F: Fn(&DeclarationContext<'_>) -> ModifyOutcome + Send + Sync + 'static,
    {
        ModifyPreflightStyles::Hook(Arc::new(hook))
    }

    pub fn map(overrides: StyleOverrides) -> Self {
        ModifyPreflightStyles::Map(overrides)
    }

    pub fn modify(&self, ctx: &DeclarationContext<'_>) -> ModifyOutcome {
        match self {
            ModifyPreflightStyles::Hook(hook) => hook(ctx),
            ModifyPreflightStyles::Map(overrides) => overrides
                .iter()
                .find(|(selector, _)| ctx.selector_set.contains(selector.as_str()))
                .and_then(|(_, properties)| properties.get(ctx.property))
                .map(|value| match value {
                    Some(value) => ModifyOutcome::Replace(value.clone()),
                    None => ModifyOutcome::Remove,
                })
                .unwrap_or(ModifyOutcome::Unchanged),
        }
    }
}

impl fmt::Debug for ModifyPreflightStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifyPreflightStyles::Hook(_) => f.write_str("Hook(..)"),
            ModifyPreflightStyles::Map(map) => f.debug_tuple("Map").field(map).finish(),
        }
    }
}

/// Counts of what the hooks did to one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookStats {
    pub modified: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DeclarationHooks {
    pub props_filter: Option<PropsFilter>,
    pub modify_preflight_styles: Option<ModifyPreflightStyles>,
}

impl DeclarationHooks {
    pub fn is_empty(&self) -> bool {
        self.props_filter.is_none() && self.modify_preflight_styles.is_none()
    }

    /// Both hooks look at the original value; a removal from either wins
    /// over a replacement.
    fn decide(&self, selector_set: &SelectorSet, decl: &Declaration) -> ModifyOutcome {
        let ctx = DeclarationContext {
            selector_set,
            property: &decl.property,
            value: &decl.value,
        };
        let modified = self
            .modify_preflight_styles
            .as_ref()
            .map(|m| m.modify(&ctx))
            .unwrap_or(ModifyOutcome::Unchanged);
        let keep = self
            .props_filter
            .as_ref()
            .map(|f| f.keep(&ctx))
            .unwrap_or(true);

        match modified {
            _ if !keep => ModifyOutcome::Remove,
            ModifyOutcome::Replace(value) if value == decl.value => ModifyOutcome::Unchanged,
            other => other,
        }
    }

    /// Runs the hooks over every declaration of `rule`, in place.
    pub fn apply(&self, rule: &mut Rule) -> HookStats {
        let mut stats = HookStats::default();
        if self.is_empty() {
            return stats;
        }
        let selector_set: SelectorSet = rule.selectors.iter().cloned().collect();

        for child in rule.nodes.iter_mut() {
            let RuleChild::Declaration(decl) = child else {
                continue;
            };
            match self.decide(&selector_set, decl) {
                ModifyOutcome::Unchanged => {}
                ModifyOutcome::Replace(value) => {
                    decl.value = value;
                    stats.modified += 1;
                }
                ModifyOutcome::Remove => {
                    let comment = decl.clone().into_comment();
                    *child = RuleChild::Comment(comment);
                    stats.removed += 1;
                }
            }
        }
        stats
    }
}
