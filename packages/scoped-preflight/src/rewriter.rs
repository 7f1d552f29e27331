//! Stylesheet Rewriter
//!
//! One pass over a parsed stylesheet: declaration hooks first, then every
//! selector of every rule goes through the isolation strategy. The resulting
//! selectors are flattened and de-duplicated. Rules left without selectors or
//! declarations are dropped from the output, and so are comments whose rule
//! was dropped. Rules nested in `@media`, `@supports` and the other
//! conditional group rules are handled the same way; other at-rule blocks
//! such as `@keyframes` or `@font-face` pass through untouched.

use tracing::debug;

use crate::config::ScopedPreflight;
use crate::css_ast::{Node, Rule, Stylesheet};
use crate::declarations::DeclarationHooks;
use crate::selectors::dedup_selectors;
use crate::strategies::IsolationStrategy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub rules: usize,
    pub selectors_removed: usize,
    pub declarations_modified: usize,
    pub declarations_removed: usize,
    pub rules_dropped: usize,
    pub comments_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct Rewritten {
    pub nodes: Vec<Node>,
    pub stats: RewriteStats,
}

/// Rewrite a single rule in place.
pub fn rewrite_rule(
    rule: &mut Rule,
    strategy: &IsolationStrategy,
    hooks: &DeclarationHooks,
    stats: &mut RewriteStats,
) {
    let hook_stats = hooks.apply(rule);
    stats.declarations_modified += hook_stats.modified;
    stats.declarations_removed += hook_stats.removed;

    let mut expanded = Vec::with_capacity(rule.selectors.len());
    for selector in &rule.selectors {
        let replacements = strategy.apply(selector);
        if replacements.is_empty() {
            stats.selectors_removed += 1;
        }
        expanded.extend(replacements);
    }
    rule.selectors = dedup_selectors(expanded);

    if !rule.has_declarations() {
        rule.nodes.clear();
    }
    stats.rules += 1;
}

/// Whether a rewritten rule still belongs in the output.
pub fn is_kept_rule(rule: &Rule) -> bool {
    !rule.nodes.is_empty() && !rule.selectors.is_empty()
}

/// Drops void rules and the comments documenting them, here and inside
/// conditional group rules. At-rules themselves always pass.
pub fn filter_output(nodes: Vec<Node>, stats: &mut RewriteStats) -> Vec<Node> {
    let keep: Vec<bool> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| match node {
            Node::Rule(rule) => is_kept_rule(rule),
            Node::Comment(_) => {
                matches!(nodes.get(i + 1), Some(Node::Rule(next)) if is_kept_rule(next))
            }
            Node::AtRule(_) => true,
        })
        .collect();

    let mut kept = Vec::with_capacity(nodes.len());
    for (node, keep) in nodes.into_iter().zip(keep) {
        match node {
            Node::Rule(_) if !keep => stats.rules_dropped += 1,
            Node::Comment(_) if !keep => stats.comments_dropped += 1,
            Node::AtRule(mut at_rule) => {
                if let Some(children) = at_rule.conditional_rules_mut() {
                    *children = filter_output(std::mem::take(children), stats);
                }
                kept.push(Node::AtRule(at_rule));
            }
            node => kept.push(node),
        }
    }
    kept
}

pub fn rewrite_with_stats(mut stylesheet: Stylesheet, plugin: &ScopedPreflight) -> Rewritten {
    let mut stats = RewriteStats::default();
    let strategy = plugin.strategy();
    let hooks = plugin.hooks();

    stylesheet.walk_rules_mut(|rule| rewrite_rule(rule, strategy, hooks, &mut stats));
    let nodes = filter_output(stylesheet.nodes, &mut stats);

    debug!(
        strategy = strategy.name(),
        rules = stats.rules,
        selectors_removed = stats.selectors_removed,
        declarations_modified = stats.declarations_modified,
        declarations_removed = stats.declarations_removed,
        rules_dropped = stats.rules_dropped,
        comments_dropped = stats.comments_dropped,
        "Preflight rewritten"
    );
    Rewritten { nodes, stats }
}

/// Rewrite a parsed stylesheet and return the nodes to emit.
pub fn rewrite(stylesheet: Stylesheet, plugin: &ScopedPreflight) -> Vec<Node> {
    rewrite_with_stats(stylesheet, plugin).nodes
}
