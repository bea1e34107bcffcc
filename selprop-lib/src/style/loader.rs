//! CSS text to an owned [`Stylesheet`].
//!
//! Selectors and declaration values are kept as the raw source text, so a
//! `ref(.a, color)` token or a `#f00` literal reaches the resolver exactly as
//! written. LightningCSS checks the sheet is well-formed first.

use crate::error::{ResolveError, ResolveResult};
use crate::style::owned_css::{Declaration, Rule, Stylesheet};
use cssparser::{
    AtRuleParser, BasicParseErrorKind, CowRcStr, DeclarationParser, ParseError, Parser,
    ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser,
};
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};
use log::{debug, warn};

/// Parse a raw CSS string and convert it to a fully-owned stylesheet.
///
/// Only style rules are kept, including the ones inside `@media` blocks.
/// Other at-rules are dropped.
pub fn parse_stylesheet(css_text: &str) -> ResolveResult<Stylesheet> {
    LightningStyleSheet::parse(css_text, ParserOptions::default())
        .map_err(|e| ResolveError::parse(e.to_string()))?;

    let mut input = ParserInput::new(css_text);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();
    collect_rules(&mut parser, None, &mut rules);
    Ok(Stylesheet { rules })
}

/// What one top-level item of a rule list turned into.
enum Item {
    Style(Rule),
    Media(Vec<Rule>),
    Skipped,
}

enum AtPrelude {
    Media(String),
    Other,
}

/// Parses a list of rules; `media` is the query of the enclosing `@media` block.
struct RuleListParser {
    media: Option<String>,
}

fn collect_rules(input: &mut Parser<'_, '_>, media: Option<String>, rules: &mut Vec<Rule>) {
    let mut list = RuleListParser { media };
    for item in StyleSheetParser::new(input, &mut list) {
        match item {
            Ok(Item::Style(rule)) => rules.push(rule),
            Ok(Item::Media(inner)) => rules.extend(inner),
            Ok(Item::Skipped) => {}
            Err((e, slice)) => warn!(
                "skipping invalid rule at {}:{}: {}",
                e.location.line + 1,
                e.location.column,
                slice.trim()
            ),
        }
    }
}

impl<'i> AtRuleParser<'i> for RuleListParser {
    type Prelude = AtPrelude;
    type AtRule = Item;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        if name.eq_ignore_ascii_case("media") {
            Ok(AtPrelude::Media(input.slice_from(start).trim().to_owned()))
        } else {
            debug!("skipping @{}", name);
            Ok(AtPrelude::Other)
        }
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        match prelude {
            AtPrelude::Media(query) => {
                let mut inner = Vec::new();
                collect_rules(input, Some(query), &mut inner);
                Ok(Item::Media(inner))
            }
            AtPrelude::Other => Ok(Item::Skipped),
        }
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        Ok(Item::Skipped)
    }
}

impl<'i> QualifiedRuleParser<'i> for RuleListParser {
    type Prelude = String;
    type QualifiedRule = Item;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(input.slice_from(start).trim().to_owned())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut body = DeclarationListParser;
        let declarations = RuleBodyParser::new(input, &mut body)
            .filter_map(|decl| match decl {
                Ok(decl) => Some(decl),
                Err((_, slice)) => {
                    warn!("skipping invalid declaration in `{}`: {}", prelude, slice.trim());
                    None
                }
            })
            .collect();
        Ok(Item::Style(Rule {
            selector: prelude,
            declarations,
            media: self.media.clone(),
        }))
    }
}

/// Records each declaration's name and raw value text, in source order.
struct DeclarationListParser;

impl<'i> DeclarationParser<'i> for DeclarationListParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let (value, important) = split_important(input.slice_from(start));
        Ok(Declaration {
            property: name.to_string(),
            value: value.to_owned(),
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclarationListParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Split a trailing `!important` off a raw value.
fn split_important(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim();
    if let Some(bang) = trimmed.rfind('!') {
        if trimmed[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (trimmed[..bang].trim_end(), true);
        }
    }
    (trimmed, false)
}
