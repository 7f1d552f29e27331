//! Stylesheet parser and serializer tests

use scoped_preflight::{
    parse_stylesheet, AtRule, AtRuleBody, Comment, Declaration, Node, ParseError, Rule, RuleChild,
    Stylesheet,
};

fn single_rule(css: &str) -> Rule {
    let sheet = parse_stylesheet(css).unwrap();
    match sheet.nodes.into_iter().next() {
        Some(Node::Rule(rule)) => rule,
        other => panic!("expected a rule, got {:?}", other),
    }
}

mod parse {
    use super::*;

    #[test]
    fn should_split_selector_lists_on_top_level_commas() {
        let rule = single_rule(
            "abbr:where([title]), [hidden]:where(:not([hidden=\"until-found\"])), input:where([type='a,b']) { margin: 0 }",
        );
        assert_eq!(
            rule.selectors,
            vec![
                "abbr:where([title])",
                "[hidden]:where(:not([hidden=\"until-found\"]))",
                "input:where([type='a,b'])",
            ]
        );
    }

    #[test]
    fn should_keep_multi_line_values_intact() {
        let rule = single_rule(
            "html {\n  font-family: ui-sans-serif, system-ui, sans-serif, \"Apple Color Emoji\";\n}",
        );
        assert_eq!(
            rule.declaration("font-family").unwrap().value,
            "ui-sans-serif, system-ui, sans-serif, \"Apple Color Emoji\""
        );
    }

    #[test]
    fn should_accept_a_missing_last_semicolon() {
        let rule = single_rule("a { color: inherit; text-decoration: inherit }");
        assert_eq!(rule.declarations().count(), 2);
        assert_eq!(rule.declaration("text-decoration").unwrap().value, "inherit");
    }

    #[test]
    fn should_keep_custom_properties_and_empty_strings() {
        let rule = single_rule("::before, ::after { --tw-content: ''; }");
        assert_eq!(rule.declaration("--tw-content").unwrap().value, "''");
    }

    #[test]
    fn should_read_comments_between_nodes() {
        let sheet = parse_stylesheet("/*\n  1. Prevent padding\n*/\n\n*, ::before { box-sizing: border-box; /* 1 */ }").unwrap();
        assert_eq!(sheet.nodes.len(), 2);
        assert_eq!(sheet.nodes[0], Node::Comment(Comment::new("1. Prevent padding")));
        match &sheet.nodes[1] {
            Node::Rule(rule) => {
                assert_eq!(rule.nodes[1], RuleChild::Comment(Comment::new("1")));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn should_nest_rules_in_at_rule_blocks() {
        let sheet = parse_stylesheet("@supports (display: grid) { @media print { a { color: red } } }").unwrap();
        let Node::AtRule(supports) = &sheet.nodes[0] else {
            panic!("expected an at-rule");
        };
        assert_eq!(supports.name, "supports");
        let Some(Node::AtRule(media)) = supports.rules().and_then(|n| n.first()) else {
            panic!("expected a nested at-rule");
        };
        assert_eq!(media.params, "print");
        assert_eq!(media.rules().map(<[Node]>::len), Some(1));
    }

    #[test]
    fn should_read_declaration_blocks_of_font_face() {
        let sheet =
            parse_stylesheet("@font-face { font-family: X; src: url(a.woff) }
p { margin: 0 }").unwrap();
        assert_eq!(sheet.nodes.len(), 2);
        let Node::AtRule(font_face) = &sheet.nodes[0] else {
            panic!("expected an at-rule");
        };
        assert_eq!(font_face.name, "font-face");
        assert_eq!(font_face.params, "");
        assert_eq!(
            font_face.body,
            Some(AtRuleBody::Declarations(vec![
                RuleChild::Declaration(Declaration::new("font-family", "X")),
                RuleChild::Declaration(Declaration::new("src", "url(a.woff)")),
            ]))
        );
        assert_eq!(sheet.rules().next().unwrap().selectors, vec!["p"]);
    }

    #[test]
    fn should_read_keyframe_selectors_as_rules() {
        let sheet = parse_stylesheet("@keyframes spin { from { opacity: 0 } 50% { opacity: .5 } }").unwrap();
        let Node::AtRule(keyframes) = &sheet.nodes[0] else {
            panic!("expected an at-rule");
        };
        assert_eq!(keyframes.params, "spin");
        let selectors: Vec<&str> = keyframes
            .rules()
            .unwrap()
            .iter()
            .filter_map(|node| match node {
                Node::Rule(rule) => Some(rule.selectors[0].as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(selectors, vec!["from", "50%"]);
    }

    #[test]
    fn should_drop_comments_inside_selectors() {
        let rule = single_rule("a /* link */, /* other */ p { color: red }");
        assert_eq!(rule.selectors, vec!["a", "p"]);
    }

    #[test]
    fn should_walk_nested_rules() {
        let mut sheet = parse_stylesheet("p { margin: 0 } @media print { a { color: red } }").unwrap();
        let mut seen = Vec::new();
        sheet.walk_rules_mut(|rule| seen.push(rule.selector()));
        assert_eq!(seen, vec!["p", "a"]);
        // keyframe selectors are not style rules
        let mut sheet = parse_stylesheet("@keyframes spin { to { opacity: 1 } }").unwrap();
        let mut count = 0;
        sheet.walk_rules_mut(|_| count += 1);
        assert_eq!(count, 0);
        // only top-level rules are listed
        assert_eq!(sheet.rules().count(), 1);
    }

    #[test]
    fn should_report_offsets() {
        assert_eq!(
            parse_stylesheet("p { margin: 0 }\n}").unwrap_err(),
            ParseError::new("unexpected '}'", 16)
        );
        assert_eq!(
            parse_stylesheet("p { margin }").unwrap_err().message,
            "expected ':' after property 'margin'"
        );
        assert_eq!(
            parse_stylesheet("@media print { p { margin: 0 }").unwrap_err(),
            ParseError::new("unclosed block", 14)
        );
    }

    #[test]
    fn should_parse_an_empty_stylesheet() {
        assert_eq!(parse_stylesheet("").unwrap(), Stylesheet::default());
        assert_eq!(parse_stylesheet("  \n ").unwrap(), Stylesheet::default());
    }
}

mod serialize {
    use super::*;

    #[test]
    fn should_print_one_selector_and_one_declaration_per_line() {
        let rule = Rule::new(
            vec!["b".to_string(), "strong".to_string()],
            vec![
                RuleChild::Declaration(Declaration::new("font-weight", "bolder")),
                RuleChild::Comment(Comment::new("1")),
            ],
        );
        assert_eq!(
            rule.to_string(),
            "b,\nstrong {\n  font-weight: bolder;\n  /* 1 */\n}"
        );
    }

    #[test]
    fn should_print_important_flags() {
        let rule = single_rule("a { color: red ! important }");
        assert_eq!(rule.to_string(), "a {\n  color: red !important;\n}");
    }

    #[test]
    fn should_separate_top_level_nodes_with_blank_lines() {
        let sheet = Stylesheet::new(vec![
            Node::Comment(Comment::new("links")),
            Node::Rule(single_rule("a { color: inherit }")),
            Node::AtRule(AtRule::new(
                "media",
                "print",
                Some(AtRuleBody::Rules(vec![Node::Rule(single_rule("p { margin: 0 }"))])),
            )),
        ]);
        assert_eq!(
            sheet.to_css(),
            "/* links */\n\na {\n  color: inherit;\n}\n\n@media print {\n  p {\n    margin: 0;\n  }\n}\n"
        );
    }

    #[test]
    fn should_print_statement_at_rules() {
        let at_rule = AtRule::new("import", "url(base.css)", None);
        assert_eq!(at_rule.to_string(), "@import url(base.css);");
    }

    #[test]
    fn should_reparse_a_font_face_rule() {
        let css = "@font-face {\n  font-family: X;\n  src: url(a.woff) format(\"woff\");\n}\n";
        let sheet = parse_stylesheet(css).unwrap();
        assert_eq!(sheet.to_css(), css);
    }

    #[test]
    fn should_reparse_to_the_same_tree() {
        let css = "/* a */\n\nhtml,\n:host {\n  line-height: 1.5;\n  /* 1 */\n}\n";
        let sheet = parse_stylesheet(css).unwrap();
        assert_eq!(sheet.to_css(), css);
        assert_eq!(parse_stylesheet(&sheet.to_css()).unwrap(), sheet);
    }
}
