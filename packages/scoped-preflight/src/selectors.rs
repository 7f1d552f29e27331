//! Selector outcomes and the shared resolver steps
//!
//! A selector transformer answers with one of three outcomes: the selector is
//! removed from its rule, kept as it is, or replaced by one or more new
//! selectors. A resolver step that has nothing to say returns `None` so the
//! next step can run.

use indexmap::IndexSet;
use smallvec::SmallVec;

/// Selectors the baseline reset anchors its lowest-specificity rules on.
pub const ROOT_SELECTORS: [&str; 3] = ["html", "body", ":host"];

pub fn is_root_selector(selector: &str) -> bool {
    ROOT_SELECTORS.contains(&selector)
}

/// Replacement selectors for a single original selector.
pub type SelectorList = SmallVec<[String; 2]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOutcome {
    /// Drop the selector from its rule.
    Removed,
    /// Keep the original selector.
    Unchanged,
    Replaced(SelectorList),
}

impl SelectorOutcome {
    pub fn replaced(selector: impl Into<String>) -> Self {
        SelectorOutcome::Replaced(smallvec::smallvec![selector.into()])
    }

    /// The selectors this outcome leaves on the rule in place of `original`.
    pub fn into_selectors(self, original: &str) -> SelectorList {
        match self {
            SelectorOutcome::Removed => SelectorList::new(),
            SelectorOutcome::Unchanged => smallvec::smallvec![original.to_string()],
            SelectorOutcome::Replaced(mut list) => {
                list.retain(|s| !s.is_empty());
                list
            }
        }
    }
}

/// The `ignore` and `remove` lists every built-in strategy accepts.
///
/// Both hold substrings: a selector containing any `remove` entry is dropped,
/// one containing any `ignore` entry passes through untouched. `remove` is
/// checked first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorFilter {
    pub ignore: Vec<String>,
    pub remove: Vec<String>,
}

impl SelectorFilter {
    pub fn new(ignore: Vec<String>, remove: Vec<String>) -> Self {
        SelectorFilter { ignore, remove }
    }

    pub fn resolve(&self, selector: &str) -> Option<SelectorOutcome> {
        if self.remove.iter().any(|s| selector.contains(s.as_str())) {
            return Some(SelectorOutcome::Removed);
        }
        if self.ignore.iter().any(|s| selector.contains(s.as_str())) {
            return Some(SelectorOutcome::Unchanged);
        }
        None
    }
}

/// Drops empty selectors and repeated ones, keeping the first occurrence.
pub fn dedup_selectors<I>(selectors: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    selectors
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Anything that can name one or several boundary selectors.
pub trait IntoSelectors {
    fn into_selectors(self) -> Vec<String>;
}

impl IntoSelectors for &str {
    fn into_selectors(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoSelectors for String {
    fn into_selectors(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoSelectors for Vec<String> {
    fn into_selectors(self) -> Vec<String> {
        self
    }
}

impl IntoSelectors for Vec<&str> {
    fn into_selectors(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoSelectors for &[&str] {
    fn into_selectors(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoSelectors for [&str; N] {
    fn into_selectors(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}
