//! CSS AST
//!
//! The small stylesheet tree the rewriter works on: top-level rules, comments
//! and at-rules, with declarations and comments inside rules. Serialization
//! follows the usual pretty-printed layout (one selector per line, one
//! declaration per line).

use std::fmt;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    Comment(Comment),
    AtRule(AtRule),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub nodes: Vec<RuleChild>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChild {
    Declaration(Declaration),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
}

/// `@name params;` or `@name params { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    pub body: Option<AtRuleBody>,
}

/// Block of an at-rule: nested rules (`@media`, `@keyframes`) or
/// declarations (`@font-face`, `@page`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtRuleBody {
    Rules(Vec<Node>),
    Declarations(Vec<RuleChild>),
}

/// Conditional group rules. Their nested rules style the document the same
/// way top-level rules do and are rewritten alongside them.
const CONDITIONAL_GROUP_RULES: &[&str] = &[
    "media",
    "supports",
    "container",
    "layer",
    "scope",
    "starting-style",
    "document",
    "-moz-document",
];

impl Stylesheet {
    pub fn new(nodes: Vec<Node>) -> Self {
        Stylesheet { nodes }
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Rule(rule) => Some(rule),
            _ => None,
        })
    }

    /// Visit every rule, including the ones nested in conditional group rules.
    pub fn walk_rules_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Rule),
    {
        walk_nodes_mut(&mut self.nodes, &mut visit);
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

fn walk_nodes_mut<F>(nodes: &mut [Node], visit: &mut F)
where
    F: FnMut(&mut Rule),
{
    for node in nodes.iter_mut() {
        match node {
            Node::Rule(rule) => visit(rule),
            Node::AtRule(at_rule) => {
                if let Some(children) = at_rule.conditional_rules_mut() {
                    walk_nodes_mut(children, visit);
                }
            }
            Node::Comment(_) => {}
        }
    }
}

impl AtRule {
    pub fn new(name: impl Into<String>, params: impl Into<String>, body: Option<AtRuleBody>) -> Self {
        AtRule {
            name: name.into(),
            params: params.into(),
            body,
        }
    }

    /// Nested rules, when the block holds rules.
    pub fn rules(&self) -> Option<&[Node]> {
        match &self.body {
            Some(AtRuleBody::Rules(nodes)) => Some(nodes),
            _ => None,
        }
    }

    pub fn is_conditional_group(&self) -> bool {
        CONDITIONAL_GROUP_RULES
            .iter()
            .any(|name| self.name.eq_ignore_ascii_case(name))
    }

    /// Nested rules of a conditional group rule. `@keyframes` selectors and
    /// other at-rule blocks are left alone.
    pub fn conditional_rules_mut(&mut self) -> Option<&mut Vec<Node>> {
        if !self.is_conditional_group() {
            return None;
        }
        match &mut self.body {
            Some(AtRuleBody::Rules(nodes)) => Some(nodes),
            _ => None,
        }
    }
}

impl Rule {
    pub fn new(selectors: Vec<String>, nodes: Vec<RuleChild>) -> Self {
        Rule { selectors, nodes }
    }

    /// The selector list as a single string, empty when no selector is left.
    pub fn selector(&self) -> String {
        self.selectors.join(",\n")
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter().filter_map(|child| match child {
            RuleChild::Declaration(decl) => Some(decl),
            RuleChild::Comment(_) => None,
        })
    }

    pub fn has_declarations(&self) -> bool {
        self.declarations().next().is_some()
    }

    pub fn declaration(&self, property: &str) -> Option<&Declaration> {
        self.declarations().find(|decl| decl.property == property)
    }
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Declaration {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Turns the declaration into an inert comment carrying its source text.
    pub fn into_comment(self) -> Comment {
        Comment::new(self.to_string())
    }
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Comment { text: text.into() }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/* {} */", self.text)
    }
}

/// Writes ` {`, one child per line and the closing brace.
fn write_declaration_block(f: &mut fmt::Formatter<'_>, children: &[RuleChild]) -> fmt::Result {
    if children.is_empty() {
        return f.write_str(" {}");
    }
    f.write_str(" {\n")?;
    for child in children {
        match child {
            RuleChild::Declaration(decl) => writeln!(f, "{}{};", INDENT, decl)?,
            RuleChild::Comment(comment) => writeln!(f, "{}{}", INDENT, comment)?,
        }
    }
    f.write_str("}")
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector())?;
        write_declaration_block(f, &self.nodes)
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, " {}", self.params)?;
        }
        match &self.body {
            None => f.write_str(";"),
            Some(AtRuleBody::Declarations(children)) => write_declaration_block(f, children),
            Some(AtRuleBody::Rules(children)) => {
                f.write_str(" {\n")?;
                for child in children {
                    for line in child.to_string().lines() {
                        if line.is_empty() {
                            writeln!(f)?;
                        } else {
                            writeln!(f, "{}{}", INDENT, line)?;
                        }
                    }
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Rule(rule) => rule.fmt(f),
            Node::Comment(comment) => comment.fmt(f),
            Node::AtRule(at_rule) => at_rule.fmt(f),
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node_list(f, &self.nodes)
    }
}

/// Writes top-level nodes separated by blank lines, with a trailing newline.
pub fn write_node_list(f: &mut impl fmt::Write, nodes: &[Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        writeln!(f, "{}", node)?;
    }
    Ok(())
}

/// Serializes a node list the way [`Stylesheet::to_css`] does.
pub fn nodes_to_css(nodes: &[Node]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_node_list(&mut out, nodes);
    out
}
