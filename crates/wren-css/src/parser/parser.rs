//! "The input to the parsing stage is a stream of tokens from the
//! tokenization stage."
//!
//! The parser produces a flat list of style rules. Rules nested inside
//! `@media` blocks carry the block's query as a guard, so the cascade never
//! has to look at at-rules.

use serde::Serialize;
use wren_common::warning::warn_once;

use crate::media::MediaQuery;
use crate::selector::{ParsedSelector, parse_selector_list};
use crate::tokenizer::{CSSToken, tokenize};

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red !important`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, lower-cased.
    pub name: String,
    /// The property value as component values, whitespace-trimmed.
    pub value: Vec<ComponentValue>,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

/// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CSSToken),
    /// A function with its arguments.
    Function {
        /// The function name.
        name: String,
        /// The function arguments.
        value: Vec<ComponentValue>,
    },
    /// A simple block.
    Block {
        /// The opening token character.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    /// True for a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Token(CSSToken::Whitespace))
    }

    /// The token, if this is a plain token.
    #[must_use]
    pub const fn token(&self) -> Option<&CSSToken> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }
}

/// A style rule: a selector group, its declarations and an optional media
/// guard inherited from enclosing `@media` blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// The selector text as written.
    pub selector_text: String,
    /// Comma-separated selectors that parsed successfully.
    pub selectors: Vec<ParsedSelector>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// The rule only applies when this query matches.
    pub media: Option<MediaQuery>,
}

/// [§ 6.4 @import](https://www.w3.org/TR/css-cascade-4/#at-import)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRule {
    /// The referenced URL as written.
    pub href: String,
    /// Media list guarding the imported sheet.
    pub media: Option<MediaQuery>,
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    /// Style rules in source order, with `@media` blocks flattened.
    pub rules: Vec<StyleRule>,
    /// `@import` rules, in source order.
    pub imports: Vec<ImportRule>,
}

impl Stylesheet {
    /// Guard every rule with `query`, combined with any existing guard.
    ///
    /// Used for `<style media>` and `<link media>`.
    #[must_use]
    pub fn with_media(mut self, query: Option<MediaQuery>) -> Self {
        let Some(query) = query else {
            return self;
        };
        for rule in &mut self.rules {
            rule.media = Some(match rule.media.take() {
                Some(inner) => MediaQuery::and(query.clone(), inner),
                None => query.clone(),
            });
        }
        self
    }
}

/// Parse stylesheet text.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    CSSParser::new(tokenize(css)).parse_stylesheet()
}

/// Parse the body of a `style` attribute.
pub fn parse_declarations(css: &str) -> Vec<Declaration> {
    CSSParser::new(tokenize(css)).parse_declaration_list()
}

/// CSS parser over a token list.
pub struct CSSParser {
    tokens: Vec<CSSToken>,
    position: usize,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    pub fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let mut sheet = Stylesheet::default();
        self.consume_list_of_rules(None, &mut sheet);
        sheet
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            match self.peek() {
                None | Some(CSSToken::EOF) => return declarations,
                Some(CSSToken::Whitespace | CSSToken::Semicolon) => {
                    let _ = self.consume();
                }
                Some(CSSToken::Ident(_)) => {
                    if let Some(declaration) = self.consume_declaration() {
                        declarations.push(declaration);
                    }
                }
                Some(_) => {
                    // "This is a parse error. ... consume a component value
                    // and throw away the returned value" until a semicolon.
                    self.skip_to_semicolon();
                }
            }
        }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_list_of_rules(&mut self, media: Option<&MediaQuery>, sheet: &mut Stylesheet) {
        loop {
            match self.peek() {
                None | Some(CSSToken::EOF) => return,
                // Stray closing braces and whitespace carry nothing.
                Some(CSSToken::Whitespace | CSSToken::RightBrace | CSSToken::Semicolon) => {
                    let _ = self.consume();
                }
                Some(CSSToken::AtKeyword(_)) => self.consume_at_rule(media, sheet),
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule(media) {
                        sheet.rules.push(rule);
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self, media: Option<&MediaQuery>, sheet: &mut Stylesheet) {
        let name = match self.consume() {
            Some(CSSToken::AtKeyword(name)) => name.to_ascii_lowercase(),
            _ => return,
        };

        let mut prelude = Vec::new();
        let block = loop {
            match self.consume() {
                None | Some(CSSToken::EOF | CSSToken::Semicolon) => break None,
                Some(CSSToken::LeftBrace) => break Some(self.consume_block_tokens()),
                Some(token) => prelude.push(token),
            }
        };
        let prelude_text = serialize(&prelude);

        match (name.as_str(), block) {
            // [§ 3 Media Queries](https://www.w3.org/TR/mediaqueries-4/#media)
            ("media", Some(tokens)) => {
                let query = MediaQuery::parse(&prelude_text).unwrap_or_else(|| {
                    warn_once("CSS", &format!("invalid media query '{}'", prelude_text.trim()));
                    MediaQuery::not_all()
                });
                let guard = match media {
                    Some(outer) => MediaQuery::and(outer.clone(), query),
                    None => query,
                };
                CSSParser::new(tokens).consume_list_of_rules(Some(&guard), sheet);
            }
            ("import", None) => {
                if let Some(import) = parse_import(&prelude, media) {
                    sheet.imports.push(import);
                }
            }
            (other, _) => {
                warn_once("CSS", &format!("ignoring unsupported at-rule @{other}"));
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self, media: Option<&MediaQuery>) -> Option<StyleRule> {
        let mut prelude = Vec::new();
        let block = loop {
            match self.consume() {
                // "This is a parse error. Return nothing."
                None | Some(CSSToken::EOF) => return None,
                Some(CSSToken::LeftBrace) => break self.consume_block_tokens(),
                Some(token) => prelude.push(token),
            }
        };

        let selector_text = serialize(&prelude).trim().to_string();
        let selectors = parse_selector_list(&selector_text);
        if selectors.is_empty() {
            warn_once("CSS", &format!("failed to parse selector '{selector_text}'"));
            return None;
        }

        let declarations = CSSParser::new(block).parse_declaration_list();
        Some(StyleRule {
            selector_text,
            selectors,
            declarations,
            media: media.cloned(),
        })
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let name = match self.consume() {
            Some(CSSToken::Ident(name)) => name.to_ascii_lowercase(),
            _ => return None,
        };
        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>,
        // this is a parse error. Return nothing."
        if self.peek() != Some(&CSSToken::Colon) {
            self.skip_to_semicolon();
            return None;
        }
        let _ = self.consume();

        let mut value = Vec::new();
        while !matches!(self.peek(), None | Some(CSSToken::EOF | CSSToken::Semicolon)) {
            if let Some(component) = self.consume_component_value() {
                value.push(component);
            }
        }

        // "If the last two non-<whitespace-token>s in the declaration's value
        // are a <delim-token> with the value "!" followed by an
        // <ident-token> with a value that is an ASCII case-insensitive match
        // for "important", remove them from the declaration's value and set
        // the declaration's important flag to true."
        trim_whitespace(&mut value);
        let important = strip_important(&mut value);
        trim_whitespace(&mut value);

        if value.is_empty() {
            return None;
        }
        Some(Declaration {
            name,
            value,
            important,
        })
    }

    /// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Option<ComponentValue> {
        let token = self.consume()?;
        Some(match token {
            CSSToken::LeftBrace => self.consume_simple_block('{', &CSSToken::RightBrace),
            CSSToken::LeftBracket => self.consume_simple_block('[', &CSSToken::RightBracket),
            CSSToken::LeftParen => self.consume_simple_block('(', &CSSToken::RightParen),
            CSSToken::Function(name) => {
                let mut value = Vec::new();
                loop {
                    match self.peek() {
                        None | Some(CSSToken::EOF) => break,
                        Some(CSSToken::RightParen) => {
                            let _ = self.consume();
                            break;
                        }
                        Some(_) => {
                            if let Some(component) = self.consume_component_value() {
                                value.push(component);
                            }
                        }
                    }
                }
                ComponentValue::Function {
                    name: name.to_ascii_lowercase(),
                    value,
                }
            }
            other => ComponentValue::Token(other),
        })
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    fn consume_simple_block(&mut self, open: char, close: &CSSToken) -> ComponentValue {
        let mut value = Vec::new();
        loop {
            match self.peek() {
                None | Some(CSSToken::EOF) => break,
                Some(token) if token == close => {
                    let _ = self.consume();
                    break;
                }
                Some(_) => {
                    if let Some(component) = self.consume_component_value() {
                        value.push(component);
                    }
                }
            }
        }
        ComponentValue::Block { token: open, value }
    }

    /// Collect the raw tokens of a `{}` block whose opening brace was just
    /// consumed, up to (not including) the matching closing brace. The
    /// result is terminated with EOF so it can seed a nested parser.
    fn consume_block_tokens(&mut self) -> Vec<CSSToken> {
        let mut depth = 1usize;
        let mut tokens = Vec::new();
        while let Some(token) = self.consume() {
            match token {
                CSSToken::EOF => break,
                CSSToken::LeftBrace => depth += 1,
                CSSToken::RightBrace => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            tokens.push(token);
        }
        tokens.push(CSSToken::EOF);
        tokens
    }

    fn skip_to_semicolon(&mut self) {
        while !matches!(self.peek(), None | Some(CSSToken::EOF | CSSToken::Semicolon)) {
            let _ = self.consume_component_value();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek() == Some(&CSSToken::Whitespace) {
            let _ = self.consume();
        }
    }

    fn consume(&mut self) -> Option<CSSToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn peek(&self) -> Option<&CSSToken> {
        self.tokens.get(self.position)
    }
}

/// `@import "a.css" screen;` or `@import url(a.css);`
fn parse_import(prelude: &[CSSToken], media: Option<&MediaQuery>) -> Option<ImportRule> {
    let mut tokens = prelude.iter().filter(|t| **t != CSSToken::Whitespace);
    let href = match tokens.next()? {
        CSSToken::String(href) => href.clone(),
        CSSToken::Function(name) if name.eq_ignore_ascii_case("url") => {
            let mut href = String::new();
            for token in tokens.by_ref() {
                match token {
                    CSSToken::RightParen => break,
                    CSSToken::String(s) => href.push_str(s),
                    other => href.push_str(&other.to_string()),
                }
            }
            href
        }
        _ => return None,
    };
    let rest = serialize(&tokens.cloned().collect::<Vec<_>>());
    let own = if rest.trim().is_empty() {
        None
    } else {
        MediaQuery::parse(&rest)
    };
    let media = match (media.cloned(), own) {
        (Some(a), Some(b)) => Some(MediaQuery::and(a, b)),
        (a, b) => a.or(b),
    };
    Some(ImportRule { href, media })
}

/// Serialize tokens back to CSS text.
fn serialize(tokens: &[CSSToken]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}

fn trim_whitespace(value: &mut Vec<ComponentValue>) {
    while value.last().is_some_and(ComponentValue::is_whitespace) {
        let _ = value.pop();
    }
    let leading = value.iter().take_while(|v| v.is_whitespace()).count();
    let _ = value.drain(..leading);
}

fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    let Some(last) = value.len().checked_sub(1) else {
        return false;
    };
    if !value[last].token().is_some_and(|t| t.is_ident("important")) {
        return false;
    }
    let bang = value[..last].iter().rposition(|v| !v.is_whitespace());
    match bang {
        Some(i) if value[i].token() == Some(&CSSToken::Delim('!')) => {
            value.truncate(i);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_rule() {
        let sheet = parse_stylesheet("p { color: red; margin: 0 auto }");
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selector_text, "p");
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[1].name, "margin");
        assert_eq!(rule.declarations[1].value.len(), 3);
        assert!(rule.media.is_none());
    }

    #[test]
    fn test_important_flag() {
        let decls = parse_declarations("color: red ! important; width: 10px");
        assert!(decls[0].important);
        assert_eq!(decls[0].value, vec![ComponentValue::Token(CSSToken::Ident("red".into()))]);
        assert!(!decls[1].important);
    }

    #[test]
    fn test_media_block_guards_nested_rules() {
        let sheet = parse_stylesheet(
            "a { color: red } @media (max-width: 600px) { p { color: blue } div { width: 1px } } b {}",
        );
        assert_eq!(sheet.rules.len(), 4);
        assert!(sheet.rules[0].media.is_none());
        assert!(sheet.rules[1].media.is_some());
        assert!(sheet.rules[2].media.is_some());
        assert!(sheet.rules[3].media.is_none());
    }

    #[test]
    fn test_malformed_declarations_are_dropped() {
        let decls = parse_declarations("color red; : x; width: ; height: 5px");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "height");
    }

    #[test]
    fn test_unsupported_at_rules_skipped() {
        let sheet = parse_stylesheet(
            "@charset \"utf-8\"; @font-face { font-family: x } @keyframes k { from { top: 0 } } p { top: 0 }",
        );
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selector_text, "p");
    }

    #[test]
    fn test_import_rule() {
        let sheet = parse_stylesheet("@import url(\"a.css\") print; @import 'b.css';");
        assert_eq!(sheet.imports.len(), 2);
        assert_eq!(sheet.imports[0].href, "a.css");
        assert!(sheet.imports[0].media.is_some());
        assert_eq!(sheet.imports[1].href, "b.css");
        assert!(sheet.imports[1].media.is_none());
    }

    #[test]
    fn test_function_values_nest() {
        let decls = parse_declarations("color: rgba(1, 2, 3, 0.5)");
        match &decls[0].value[0] {
            ComponentValue::Function { name, value } => {
                assert_eq!(name, "rgba");
                assert_eq!(value.len(), 10);
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_rule_is_dropped() {
        let sheet = parse_stylesheet("p { color: red } div");
        assert_eq!(sheet.rules.len(), 1);
    }
}
