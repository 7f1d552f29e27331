//! Scoped baseline reset tests

mod utils;

use scoped_preflight::{
    parse_stylesheet, ForComponentsOptions, InsideOfContainerOptions, IsolationStrategy, Node,
    OutsideOfContainerOptions, ScopedPreflight,
};
use utils::{assert_contains, assert_not_contains, plugin};

fn rewritten_nodes(plugin: &ScopedPreflight) -> Vec<Node> {
    parse_stylesheet(&plugin.rewrite_baseline()).unwrap().nodes
}

fn all_selectors(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Rule(rule) => Some(rule.selectors.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

mod inside_of_container {
    use super::*;

    fn two_containers() -> ScopedPreflight {
        plugin(IsolationStrategy::inside_of_container(
            [".tw", ".tw2"],
            InsideOfContainerOptions {
                except: Some(".no-tw".to_string()),
                ..Default::default()
            },
        ))
    }

    #[test]
    fn should_move_body_styles_to_the_containers() {
        let css = two_containers().rewrite_baseline();
        assert_contains(
            &css,
            ".tw:where(:not(.no-tw,.no-tw *)),\n.tw2:where(:not(.no-tw,.no-tw *)) {\n  margin: 0;",
        );
    }

    #[test]
    fn should_scope_elements_to_both_containers() {
        let css = two_containers().rewrite_baseline();
        assert_contains(
            &css,
            "hr:where(.tw,.tw *):where(:not(.no-tw,.no-tw *)),\nhr:where(.tw2,.tw2 *):where(:not(.no-tw,.no-tw *)) {\n  height: 0;",
        );
    }

    #[test]
    fn should_not_leave_any_selector_unscoped() {
        let selectors = all_selectors(&rewritten_nodes(&two_containers()));
        assert!(!selectors.is_empty());
        for selector in selectors {
            assert!(selector.contains(".tw"), "unscoped selector {}", selector);
            assert!(
                selector.ends_with(":where(:not(.no-tw,.no-tw *))"),
                "missing except clause on {}",
                selector
            );
        }
    }

    #[test]
    fn should_scope_an_id_container() {
        let css = plugin(IsolationStrategy::inside_of_container(
            "#somecontainer",
            InsideOfContainerOptions {
                except: Some(".no-tw".to_string()),
                ..Default::default()
            },
        ))
        .rewrite_baseline();
        assert_contains(&css, "#somecontainer:where(:not(.no-tw,.no-tw *)) {\n  line-height: 1.5;");
        assert_contains(
            &css,
            "::before:where(#somecontainer,#somecontainer *):where(:not(.no-tw,.no-tw *))",
        );
    }
}

mod outside_of_container {
    use super::*;

    fn two_containers_plus() -> ScopedPreflight {
        plugin(IsolationStrategy::outside_of_container(
            [".no-tw", ".no-tw-2"],
            OutsideOfContainerOptions {
                plus: Some(".tw".to_string()),
                ..Default::default()
            },
        ))
    }

    #[test]
    fn should_leave_root_rules_untouched() {
        let css = two_containers_plus().rewrite_baseline();
        assert_contains(&css, "html,\n:host {\n  line-height: 1.5;");
        assert_contains(&css, "\nbody {\n  margin: 0;");
    }

    #[test]
    fn should_exclude_containers_and_readmit_the_plus_region() {
        let css = two_containers_plus().rewrite_baseline();
        assert_contains(
            &css,
            "a:where(:not(.no-tw,.no-tw *,.no-tw-2,.no-tw-2 *)),\na:where(.tw,.tw *) {\n  color: inherit;",
        );
    }
}

mod for_components {
    use super::*;

    #[test]
    fn should_target_the_components_under_the_roots() {
        let css = plugin(IsolationStrategy::for_components(".comp", Default::default()))
            .rewrite_baseline();
        assert_contains(&css, "html :where(.comp),\n:host :where(.comp) {");
        assert_contains(&css, "body :where(.comp) {");
        assert_contains(&css, "summary:where(.comp,.comp *) {");
    }

    #[test]
    fn should_drop_removed_rules_with_their_comments() {
        let css = plugin(IsolationStrategy::for_components(
            ".comp",
            ForComponentsOptions {
                remove: vec!["::-webkit".to_string(), ":-moz".to_string()],
                ..Default::default()
            },
        ))
        .rewrite_baseline();
        assert_not_contains(&css, "-webkit-search-decoration");
        assert_not_contains(&css, "Correct the cursor style of increment and decrement buttons");
        assert_not_contains(&css, "modern Firefox focus style");
        assert_contains(&css, "Add the correct display in Chrome and Safari.");
        // declarations named like removed selectors are not affected
        assert_contains(&css, "-webkit-appearance: button;");
    }
}

#[test]
fn should_keep_every_comment_attached_to_a_rule() {
    let plugin = plugin(IsolationStrategy::for_components(
        ".comp",
        ForComponentsOptions {
            remove: vec!["::".to_string(), "[".to_string()],
            ..Default::default()
        },
    ));
    let nodes = rewritten_nodes(&plugin);
    for (i, node) in nodes.iter().enumerate() {
        if let Node::Comment(comment) = node {
            assert!(
                matches!(nodes.get(i + 1), Some(Node::Rule(_))),
                "dangling comment {:?}",
                comment.text
            );
        }
    }
}

#[test]
fn should_count_baseline_rules() {
    let plugin = plugin(IsolationStrategy::inside_of_container(".tw", Default::default()));
    let rewritten = plugin.rewrite_with_stats(scoped_preflight::preflight::baseline_stylesheet());
    assert!(rewritten.stats.rules > 30);
    assert_eq!(rewritten.stats.selectors_removed, 0);
    assert_eq!(rewritten.stats.rules_dropped, 0);
}
