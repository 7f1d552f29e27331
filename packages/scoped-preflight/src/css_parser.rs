//! CSS Parser
//!
//! Builds the [`Stylesheet`] tree on top of the `cssparser` tokenizer:
//! comments, rules with their declarations, and at-rules with or without a
//! block. Tokens are read with comments included so that top-level comments
//! survive as nodes; comments inside selectors and values are dropped.
//!
//! Whether an at-rule block holds rules or declarations depends on its name
//! (`@media { a {..} }` vs `@font-face { src: ..; }`).

use cssparser::{
    Delimiter, ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, SourceLocation,
    SourcePosition, Token,
};

use crate::css_ast::{AtRule, AtRuleBody, Comment, Declaration, Node, Rule, RuleChild, Stylesheet};
use crate::error::ParseError;

type CssResult<'i, T> = Result<T, CssParseError<'i, ParseError>>;

/// At-rules whose block is a declaration list.
const DECLARATION_AT_RULES: &[&str] = &[
    "font-face",
    "page",
    "property",
    "counter-style",
    "font-palette-values",
    "color-profile",
    "viewport",
    "-ms-viewport",
    "view-transition",
    "position-try",
];

/// Parse stylesheet text.
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, ParseError> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_node_list(&mut parser)
        .map(Stylesheet::new)
        .map_err(|err| match err.kind {
            ParseErrorKind::Custom(error) => error,
            ParseErrorKind::Basic(kind) => {
                ParseError::new(format!("{:?}", kind), byte_offset(css, err.location))
            }
        })
}

fn byte_offset(css: &str, location: SourceLocation) -> usize {
    let line_start: usize = css
        .split_inclusive('\n')
        .take(location.line as usize)
        .map(str::len)
        .sum();
    (line_start + location.column.saturating_sub(1) as usize).min(css.len())
}

fn fail<'i>(
    input: &Parser<'i, '_>,
    message: impl Into<String>,
    at: SourcePosition,
) -> CssParseError<'i, ParseError> {
    input.new_custom_error(ParseError::new(message, at.byte_index()))
}

fn parse_node_list<'i>(input: &mut Parser<'i, '_>) -> CssResult<'i, Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        let state = input.state();
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(nodes),
        };
        match token {
            Token::WhiteSpace(_) | Token::Semicolon | Token::CDO | Token::CDC => {}
            Token::Comment(text) => nodes.push(Node::Comment(read_comment(input, start, text)?)),
            Token::AtKeyword(name) => {
                nodes.push(Node::AtRule(parse_at_rule(input, name.as_ref().to_string())?))
            }
            Token::CloseCurlyBracket => return Err(fail(input, "unexpected '}'", start)),
            _ => {
                input.reset(&state);
                nodes.push(Node::Rule(parse_rule(input)?));
            }
        }
    }
}

fn read_comment<'i>(input: &Parser<'i, '_>, start: SourcePosition, text: &str) -> CssResult<'i, Comment> {
    let raw = input.slice_from(start);
    if raw.len() < 4 || !raw.ends_with("*/") {
        return Err(fail(input, "unterminated comment", start));
    }
    Ok(Comment::new(text.trim()))
}

fn parse_at_rule<'i>(input: &mut Parser<'i, '_>, name: String) -> CssResult<'i, AtRule> {
    let params = input.parse_until_before(Delimiter::CurlyBracketBlock | Delimiter::Semicolon, |prelude| {
        read_text(prelude)
    })?;
    // `;` or end of input ends a statement at-rule.
    let has_block = matches!(input.next(), Ok(Token::CurlyBracketBlock));
    let body = if !has_block {
        None
    } else if DECLARATION_AT_RULES
        .iter()
        .any(|known| name.eq_ignore_ascii_case(known))
    {
        Some(AtRuleBody::Declarations(parse_block(input, |block| {
            parse_declaration_list(block)
        })?))
    } else {
        Some(AtRuleBody::Rules(parse_block(input, |block| parse_node_list(block))?))
    };
    Ok(AtRule { name, params, body })
}

fn parse_rule<'i>(input: &mut Parser<'i, '_>) -> CssResult<'i, Rule> {
    let start = input.position();
    let selectors = input.parse_until_before(Delimiter::CurlyBracketBlock | Delimiter::Semicolon, |prelude| {
        read_selector_list(prelude)
    })?;
    if !matches!(input.next(), Ok(Token::CurlyBracketBlock)) {
        return Err(fail(input, "expected '{' after selector", start));
    }
    let nodes = parse_block(input, |block| parse_declaration_list(block))?;
    Ok(Rule::new(selectors, nodes))
}

/// Parses the `{}` block whose opening token was just consumed and checks
/// that it is closed before the end of input.
fn parse_block<'i, T, F>(input: &mut Parser<'i, '_>, parse: F) -> CssResult<'i, T>
where
    F: for<'tt> FnOnce(&mut Parser<'i, 'tt>) -> CssResult<'i, T>,
{
    let start = input.position();
    let mut end = start;
    let result = input.parse_nested_block(|block: &mut Parser<'i, '_>| {
        let result = parse(block);
        end = block.position();
        result
    })?;
    if input.slice_from(end).is_empty() {
        return Err(fail(input, "unclosed block", start));
    }
    Ok(result)
}

fn parse_declaration_list<'i>(input: &mut Parser<'i, '_>) -> CssResult<'i, Vec<RuleChild>> {
    let mut children = Vec::new();
    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(children),
        };
        match token {
            Token::WhiteSpace(_) | Token::Semicolon => {}
            Token::Comment(text) => children.push(RuleChild::Comment(read_comment(input, start, text)?)),
            Token::Ident(_) => {
                let property = input.slice_from(start).to_string();
                children.push(RuleChild::Declaration(parse_declaration(input, property, start)?));
            }
            _ => return Err(fail(input, "expected a declaration", start)),
        }
    }
}

fn parse_declaration<'i>(
    input: &mut Parser<'i, '_>,
    property: String,
    start: SourcePosition,
) -> CssResult<'i, Declaration> {
    if input.expect_colon().is_err() {
        return Err(fail(
            input,
            format!("expected ':' after property '{}'", property),
            start,
        ));
    }
    let (value, important) = input.parse_until_before(Delimiter::Semicolon, |value| read_value(value))?;
    Ok(Declaration {
        property,
        value,
        important,
    })
}

/// Reads a declaration value, splitting off a trailing `!important`.
fn read_value<'i>(input: &mut Parser<'i, '_>) -> CssResult<'i, (String, bool)> {
    let mut value = String::new();
    let mut important = false;
    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        if token == Token::Delim('!') {
            let state = input.state();
            let is_important = matches!(
                input.next(),
                Ok(Token::Ident(name)) if name.eq_ignore_ascii_case("important")
            );
            if is_important {
                important = true;
                continue;
            }
            input.reset(&state);
        }
        push_token(input, &token, start, &mut value)?;
    }
    Ok((value.trim().to_string(), important))
}

/// Reads a selector prelude and splits it on its top-level commas.
fn read_selector_list<'i>(input: &mut Parser<'i, '_>) -> CssResult<'i, Vec<String>> {
    let mut selectors = Vec::new();
    let mut current = String::new();
    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        if token == Token::Comma {
            selectors.push(current.trim().to_string());
            current.clear();
        } else {
            push_token(input, &token, start, &mut current)?;
        }
    }
    selectors.push(current.trim().to_string());
    selectors.retain(|s| !s.is_empty());
    Ok(selectors)
}

fn read_text<'i>(input: &mut Parser<'i, '_>) -> CssResult<'i, String> {
    let mut text = String::new();
    push_tokens(input, &mut text)?;
    Ok(text.trim().to_string())
}

fn push_tokens<'i>(input: &mut Parser<'i, '_>, out: &mut String) -> CssResult<'i, ()> {
    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };
        push_token(input, &token, start, out)?;
    }
}

/// Appends the source text of `token`. Comments are dropped and whitespace
/// runs collapse to one space. Function and bracket contents are read
/// recursively so nested comments go as well.
fn push_token<'i>(
    input: &mut Parser<'i, '_>,
    token: &Token<'i>,
    start: SourcePosition,
    out: &mut String,
) -> CssResult<'i, ()> {
    match token {
        Token::Comment(_) => {}
        Token::WhiteSpace(_) => {
            if !out.is_empty() && !out.ends_with([' ', '(', '[']) {
                out.push(' ');
            }
        }
        Token::Function(_)
        | Token::ParenthesisBlock
        | Token::SquareBracketBlock
        | Token::CurlyBracketBlock => {
            out.push_str(input.slice_from(start));
            let close = match token {
                Token::SquareBracketBlock => ']',
                Token::CurlyBracketBlock => '}',
                _ => ')',
            };
            input.parse_nested_block(|block: &mut Parser<'i, '_>| push_tokens(block, out))?;
            if out.ends_with(' ') {
                out.pop();
            }
            out.push(close);
        }
        _ => out.push_str(input.slice_from(start)),
    }
    Ok(())
}
