//! CSS selector parsing and matching
//!
//! Implements the subset of [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//! a static renderer can evaluate: type, universal, class, id and attribute
//! selectors, structural pseudo-classes, the `::marker` pseudo-element and
//! all four combinators.

use wren_common::warning::warn_once;
use wren_dom::{DomTree, ElementData, NodeId};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `p`, `li`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Example: `.note`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Example: `#main`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// A pseudo-class or pseudo-element that cannot match in a static
    /// render (`:hover`, `:nth-child(2)`, `::before`). Keeps the rule
    /// parseable while making the selector inert.
    NeverMatch,

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),

    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    PseudoElement(PseudoElement),
}

/// Structural pseudo-classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,
    /// [§ 4.12 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 4.12 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 4.12 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 4.11 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 4.11 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "The :empty pseudo-class represents an element that has no children at all."
    Empty,
    /// [§ 4.6 :link](https://www.w3.org/TR/selectors-4/#the-link-pseudo)
    /// Every `a[href]` counts as unvisited.
    Link,
}

/// Pseudo-elements that generate boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoElement {
    /// [CSS Lists § 3.1 ::marker](https://www.w3.org/TR/css-lists-3/#marker-pseudo)
    Marker,
}

/// The comparison an attribute selector performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[att]`
    Exists,
    /// `[att=val]`
    Equals,
    /// `[att~=val]`: one of the whitespace-separated words equals `val`.
    Includes,
    /// `[att|=val]`: exactly `val` or `val` followed by `-`.
    DashMatch,
    /// `[att^=val]`
    Prefix,
    /// `[att$=val]`
    Suffix,
    /// `[att*=val]`
    Substring,
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Lower-cased attribute name.
    pub name: String,
    /// Comparison kind.
    pub operator: AttributeOperator,
    /// Value to compare against (empty for `Exists`).
    pub value: String,
    /// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    /// "an i ... before the closing bracket ... causes the value to be
    /// matched ASCII case-insensitively."
    pub case_insensitive: bool,
}

impl AttributeSelector {
    fn matches(&self, element: &ElementData) -> bool {
        let Some(actual) = element.attr(&self.name) else {
            return false;
        };
        let (actual, expected) = if self.case_insensitive {
            (actual.to_ascii_lowercase(), self.value.to_ascii_lowercase())
        } else {
            (actual.to_string(), self.value.clone())
        };
        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::Includes => {
                !expected.is_empty() && actual.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeOperator::DashMatch => {
                actual == expected || actual.starts_with(&format!("{expected}-"))
            }
            // "If 'val' is the empty string then the selector does not represent anything."
            AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
            AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
            AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
        }
    }
}

/// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#structure)
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// The simple selectors, all of which must match.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 15 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A + B`
    NextSibling,
    /// `A ~ B`
    SubsequentSibling,
}

/// A chain of compound selectors. Stored right to left: `subject` is the
/// rightmost compound, and each entry in `combinators` relates the compound
/// to the left of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector.
    pub subject: CompoundSelector,
    /// `(combinator, compound)` pairs, nearest to the subject first.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// `(level, ids, classes, types)`, compared lexicographically. `level` is
/// the cascade origin level (0 normal, 1 inline style, 2 `!important`,
/// 3 inline `!important`); selectors themselves always carry 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32, pub u32);

impl Specificity {
    /// Build a specificity from its four components.
    #[must_use]
    pub const fn new(level: u32, ids: u32, classes: u32, types: u32) -> Self {
        Self(level, ids, classes, types)
    }

    /// The same selector weight at a different origin level.
    #[must_use]
    pub const fn with_level(self, level: u32) -> Self {
        Self(level, self.1, self.2, self.3)
    }
}

/// A parsed selector with its specificity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The selector chain.
    pub complex: ComplexSelector,
    /// Pre-computed specificity.
    pub specificity: Specificity,
    /// The pseudo-element the selector targets, if any.
    pub pseudo_element: Option<PseudoElement>,
}

impl ParsedSelector {
    /// Check whether the selector matches the element `node_id`.
    ///
    /// Selectors targeting a pseudo-element never match the element itself.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.pseudo_element.is_none() && self.complex.matches(tree, node_id)
    }

    /// Check whether the selector targets `pseudo` of the originating
    /// element `node_id`.
    #[must_use]
    pub fn matches_pseudo(&self, tree: &DomTree, node_id: NodeId, pseudo: PseudoElement) -> bool {
        self.pseudo_element == Some(pseudo) && self.complex.matches(tree, node_id)
    }
}

impl ComplexSelector {
    /// [§ 3.2 Data Model](https://www.w3.org/TR/selectors-4/#data-model)
    /// Match right to left, backtracking over descendant and subsequent
    /// sibling relations.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        compound_matches(&self.subject, tree, node_id) && self.matches_from(0, tree, node_id)
    }

    fn matches_from(&self, index: usize, tree: &DomTree, node_id: NodeId) -> bool {
        let Some((combinator, compound)) = self.combinators.get(index) else {
            return true;
        };
        let try_candidate =
            |candidate: NodeId| compound_matches(compound, tree, candidate) && self.matches_from(index + 1, tree, candidate);

        match combinator {
            Combinator::Child => tree
                .parent(node_id)
                .filter(|&p| tree.as_element(p).is_some())
                .is_some_and(try_candidate),
            Combinator::Descendant => tree
                .ancestors(node_id)
                .filter(|&a| tree.as_element(a).is_some())
                .any(try_candidate),
            Combinator::NextSibling => tree
                .preceding_siblings(node_id)
                .find(|&s| tree.as_element(s).is_some())
                .is_some_and(try_candidate),
            Combinator::SubsequentSibling => tree
                .preceding_siblings(node_id)
                .filter(|&s| tree.as_element(s).is_some())
                .any(try_candidate),
        }
    }

    /// Sum the specificity of every compound in the chain.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        std::iter::once(&self.subject)
            .chain(self.combinators.iter().map(|(_, c)| c))
            .map(compound_specificity)
            .fold(Specificity::default(), |acc, s| {
                Specificity(0, acc.1 + s.1, acc.2 + s.2, acc.3 + s.3)
            })
    }
}

/// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "count the number of ID selectors in the selector (= A)
///  count the number of class selectors, attributes selectors, and
///  pseudo-classes in the selector (= B)
///  count the number of type selectors and pseudo-elements in the
///  selector (= C)
///  ignore the universal selector"
fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();
    for simple in &compound.simple_selectors {
        match simple {
            SimpleSelector::Id(_) => spec.1 += 1,
            SimpleSelector::Class(_)
            | SimpleSelector::PseudoClass(_)
            | SimpleSelector::Attribute(_)
            | SimpleSelector::NeverMatch => spec.2 += 1,
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => spec.3 += 1,
            SimpleSelector::Universal => {}
        }
    }
    spec
}

fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node_id: NodeId) -> bool {
    let Some(element) = tree.as_element(node_id) else {
        return false;
    };
    compound.simple_selectors.iter().all(|simple| match simple {
        SimpleSelector::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
        SimpleSelector::Class(class) => element.classes().contains(class.as_str()),
        SimpleSelector::Id(id) => element.id().is_some_and(|el_id| el_id == id),
        SimpleSelector::Universal => true,
        SimpleSelector::NeverMatch => false,
        SimpleSelector::Attribute(attr) => attr.matches(element),
        SimpleSelector::PseudoClass(pc) => pseudo_class_matches(*pc, tree, node_id, element),
        // The pseudo-element is filtered by `ParsedSelector`; the compound
        // itself is tested against the originating element.
        SimpleSelector::PseudoElement(_) => true,
    })
}

fn pseudo_class_matches(pc: PseudoClass, tree: &DomTree, node_id: NodeId, element: &ElementData) -> bool {
    let is_element = |id: &NodeId| tree.as_element(*id).is_some();
    let same_type =
        |id: &NodeId| tree.as_element(*id).is_some_and(|e| e.tag_name == element.tag_name);

    match pc {
        PseudoClass::Root => tree.document_element() == Some(node_id),
        PseudoClass::FirstChild => !tree.preceding_siblings(node_id).any(|s| is_element(&s)),
        PseudoClass::LastChild => !tree.following_siblings(node_id).any(|s| is_element(&s)),
        PseudoClass::OnlyChild => {
            !tree.preceding_siblings(node_id).any(|s| is_element(&s))
                && !tree.following_siblings(node_id).any(|s| is_element(&s))
        }
        PseudoClass::FirstOfType => !tree.preceding_siblings(node_id).any(|s| same_type(&s)),
        PseudoClass::LastOfType => !tree.following_siblings(node_id).any(|s| same_type(&s)),
        PseudoClass::Empty => tree.children(node_id).is_empty(),
        PseudoClass::Link => {
            element.tag_name == "a" && element.attr("href").is_some()
        }
    }
}

/// Parse a comma-separated selector list.
///
/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
/// "If just one of these selectors were invalid, the entire selector list
/// would be invalid." An invalid list yields an empty vector.
#[must_use]
pub fn parse_selector_list(raw: &str) -> Vec<ParsedSelector> {
    let mut selectors = Vec::new();
    for part in split_top_level_commas(raw) {
        match parse_selector(part) {
            Some(selector) => selectors.push(selector),
            None => return Vec::new(),
        }
    }
    selectors
}

/// Parse a single complex selector such as `ul > li.item::marker`.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    let mut parser = SelectorParser {
        chars: raw.trim().chars().collect(),
        pos: 0,
    };

    // Compounds in source order, each with the combinator to its left.
    let mut compounds: Vec<(Option<Combinator>, CompoundSelector)> = Vec::new();
    let mut pseudo_element = None;
    loop {
        let saw_whitespace = parser.skip_whitespace();
        let Some(c) = parser.peek() else {
            break;
        };

        let combinator = match c {
            '>' | '+' | '~' => {
                parser.pos += 1;
                let _ = parser.skip_whitespace();
                Some(match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                })
            }
            _ if saw_whitespace && !compounds.is_empty() => Some(Combinator::Descendant),
            _ => None,
        };
        if combinator.is_some() == compounds.is_empty() {
            return None;
        }
        // "Pseudo-elements ... must be the last compound in the selector."
        if pseudo_element.is_some() {
            return None;
        }

        let compound = parser.parse_compound()?;
        pseudo_element = compound.simple_selectors.iter().find_map(|s| match s {
            SimpleSelector::PseudoElement(pe) => Some(*pe),
            _ => None,
        });
        compounds.push((combinator, compound));
    }

    let (mut relation, subject) = compounds.pop()?;
    let mut combinators = Vec::with_capacity(compounds.len());
    while let Some((left, compound)) = compounds.pop() {
        combinators.push((relation?, compound));
        relation = left;
    }

    let complex = ComplexSelector {
        subject,
        combinators,
    };
    let specificity = complex.calculate_specificity();
    Some(ParsedSelector {
        complex,
        specificity,
        pseudo_element,
    })
}

fn split_top_level_commas(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}

struct SelectorParser {
    chars: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
    fn consume_ident(&mut self) -> Option<String> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                ident.push(self.peek()?);
                self.pos += 1;
            } else if is_ident_char(c) {
                ident.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        (!ident.is_empty()).then_some(ident)
    }

    fn parse_compound(&mut self) -> Option<CompoundSelector> {
        let mut simple_selectors = Vec::new();
        while let Some(c) = self.peek() {
            let simple = match c {
                '*' => {
                    self.pos += 1;
                    SimpleSelector::Universal
                }
                '.' => {
                    self.pos += 1;
                    SimpleSelector::Class(self.consume_ident()?)
                }
                '#' => {
                    self.pos += 1;
                    SimpleSelector::Id(self.consume_ident()?)
                }
                '[' => {
                    self.pos += 1;
                    SimpleSelector::Attribute(self.parse_attribute()?)
                }
                ':' => self.parse_pseudo()?,
                c if is_ident_start_char(c) || c == '\\' => {
                    // A type selector must come first in its compound.
                    if !simple_selectors.is_empty() {
                        return None;
                    }
                    SimpleSelector::Type(self.consume_ident()?.to_ascii_lowercase())
                }
                _ => break,
            };
            simple_selectors.push(simple);
        }
        (!simple_selectors.is_empty()).then_some(CompoundSelector { simple_selectors })
    }

    fn parse_pseudo(&mut self) -> Option<SimpleSelector> {
        self.pos += 1;
        let double = self.peek() == Some(':');
        if double {
            self.pos += 1;
        }
        let name = self.consume_ident()?.to_ascii_lowercase();

        if self.peek() == Some('(') {
            // Functional pseudo-classes (`:not()`, `:nth-child()`) are not
            // evaluated; skip the balanced argument list.
            let mut depth = 0usize;
            while let Some(c) = self.peek() {
                self.pos += 1;
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            if depth != 0 {
                return None;
            }
            return Some(SimpleSelector::NeverMatch);
        }

        if double {
            return Some(match name.as_str() {
                "marker" => SimpleSelector::PseudoElement(PseudoElement::Marker),
                _ => SimpleSelector::NeverMatch,
            });
        }

        let pc = match name.as_str() {
            "root" => PseudoClass::Root,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "empty" => PseudoClass::Empty,
            "link" | "any-link" => PseudoClass::Link,
            // Legacy single-colon pseudo-elements and interactive states.
            "before" | "after" | "first-line" | "first-letter" | "hover" | "focus"
            | "focus-within" | "focus-visible" | "active" | "visited" | "target" | "checked"
            | "disabled" | "enabled" => return Some(SimpleSelector::NeverMatch),
            other => {
                warn_once("CSS", &format!("unsupported pseudo-class ':{other}'"));
                return Some(SimpleSelector::NeverMatch);
            }
        };
        Some(SimpleSelector::PseudoClass(pc))
    }

    /// Parse the inside of `[...]`; the opening bracket is already consumed.
    fn parse_attribute(&mut self) -> Option<AttributeSelector> {
        let _ = self.skip_whitespace();
        let name = self.consume_ident()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        let operator = match (self.peek()?, self.peek_at(1)) {
            (']', _) => {
                self.pos += 1;
                return Some(AttributeSelector {
                    name,
                    operator: AttributeOperator::Exists,
                    value: String::new(),
                    case_insensitive: false,
                });
            }
            ('=', _) => AttributeOperator::Equals,
            ('~', Some('=')) => AttributeOperator::Includes,
            ('|', Some('=')) => AttributeOperator::DashMatch,
            ('^', Some('=')) => AttributeOperator::Prefix,
            ('$', Some('=')) => AttributeOperator::Suffix,
            ('*', Some('=')) => AttributeOperator::Substring,
            _ => return None,
        };
        self.pos += if operator == AttributeOperator::Equals { 1 } else { 2 };
        let _ = self.skip_whitespace();

        let value = match self.peek()? {
            q @ ('"' | '\'') => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    let c = self.peek()?;
                    self.pos += 1;
                    match c {
                        '\\' => {
                            value.push(self.peek()?);
                            self.pos += 1;
                        }
                        c if c == q => break,
                        c => value.push(c),
                    }
                }
                value
            }
            _ => self.consume_ident()?,
        };
        let saw_whitespace = self.skip_whitespace();

        let mut case_insensitive = false;
        if saw_whitespace && let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.pos += 1;
            let _ = self.skip_whitespace();
        }

        if self.peek()? != ']' {
            return None;
        }
        self.pos += 1;
        Some(AttributeSelector {
            name,
            operator,
            value,
            case_insensitive,
        })
    }
}

/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_right_to_left() {
        let sel = parse_selector("div > ul li + a").unwrap();
        assert_eq!(
            sel.complex.subject.simple_selectors,
            vec![SimpleSelector::Type("a".into())]
        );
        let combinators: Vec<Combinator> = sel.complex.combinators.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            combinators,
            vec![Combinator::NextSibling, Combinator::Descendant, Combinator::Child]
        );
        assert_eq!(sel.specificity, Specificity::new(0, 0, 0, 4));
    }

    #[test]
    fn test_specificity_counts() {
        let sel = parse_selector("#nav .item[data-x]:first-child p::marker").unwrap();
        assert_eq!(sel.specificity, Specificity::new(0, 1, 3, 2));
        assert_eq!(sel.pseudo_element, Some(PseudoElement::Marker));
        assert_eq!(parse_selector("*").unwrap().specificity, Specificity::default());
    }

    #[test]
    fn test_attribute_forms() {
        let sel = parse_selector("[ lang |= \"en\" i ]").unwrap();
        match &sel.complex.subject.simple_selectors[0] {
            SimpleSelector::Attribute(attr) => {
                assert_eq!(attr.name, "lang");
                assert_eq!(attr.operator, AttributeOperator::DashMatch);
                assert_eq!(attr.value, "en");
                assert!(attr.case_insensitive);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(parse_selector("> a").is_none());
        assert!(parse_selector("a >").is_none());
        assert!(parse_selector("a::marker b").is_none());
        assert!(parse_selector("[x=").is_none());
        assert!(parse_selector(".").is_none());
        assert!(parse_selector_list("a, , b").is_empty());
    }

    #[test]
    fn test_list_split_respects_brackets() {
        let list = parse_selector_list("a[title=\"x,y\"], p:not(.a, .b)");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_interactive_pseudo_is_inert() {
        let sel = parse_selector("a:hover").unwrap();
        assert!(sel.complex.subject.simple_selectors.contains(&SimpleSelector::NeverMatch));
    }
}
