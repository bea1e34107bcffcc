// src/style/owned_css.rs (the owned stylesheet the resolver mutates in place)
use std::fmt;

/// A fully-owned stylesheet: style rules in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Raw selector text, e.g. ".a, .b:hover". May hold several comma-separated selectors.
    pub selector: String,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Media condition of the enclosing `@media` block, if the rule was loaded from one.
    pub media: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Position of a declaration inside a [`Stylesheet`].
///
/// Stands in for the declaration's back-reference to its owning rule: `rule`
/// indexes `Stylesheet::rules`, `decl` indexes that rule's declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId {
    pub rule: usize,
    pub decl: usize,
}

impl Stylesheet {
    pub fn new() -> Self {
        Stylesheet { rules: Vec::new() }
    }

    /// Builder used by tests and callers that assemble a sheet by hand.
    pub fn with_rule(mut self, selector: &str, declarations: &[(&str, &str)]) -> Self {
        self.rules.push(Rule::new(selector, declarations));
        self
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.rules[id.rule].declarations[id.decl]
    }

    pub fn declaration_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.rules[id.rule].declarations[id.decl]
    }

    /// The owning rule of a declaration.
    pub fn owner(&self, id: DeclId) -> &Rule {
        &self.rules[id.rule]
    }

    /// Every declaration with its id, in document order.
    pub fn declarations(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.rules.iter().enumerate().flat_map(|(rule_idx, rule)| {
            rule.declarations
                .iter()
                .enumerate()
                .map(move |(decl_idx, decl)| {
                    (
                        DeclId {
                            rule: rule_idx,
                            decl: decl_idx,
                        },
                        decl,
                    )
                })
        })
    }

    /// Value of the first declaration of `property` in the first rule whose raw
    /// selector equals `selector`. Convenience for tests.
    pub fn value_of(&self, selector: &str, property: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.selector == selector)
            .and_then(|rule| rule.declarations.iter().find(|d| d.property == property))
            .map(|decl| decl.value.as_str())
    }
}

impl Rule {
    pub fn new(selector: &str, declarations: &[(&str, &str)]) -> Self {
        Rule {
            selector: selector.to_string(),
            declarations: declarations
                .iter()
                .map(|(property, value)| Declaration::new(property, value))
                .collect(),
            media: None,
        }
    }

    /// The component selectors of the raw selector list, trimmed.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selector.split(',').map(str::trim)
    }
}

impl Declaration {
    pub fn new(property: &str, value: &str) -> Self {
        Declaration {
            property: property.to_string(),
            value: value.to_string(),
            important: false,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            write!(f, " !important")?;
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for (idx, decl) in self.declarations.iter().enumerate() {
            let sep = if idx == 0 { " " } else { "; " };
            write!(f, "{}{}", sep, decl)?;
        }
        if self.declarations.is_empty() {
            write!(f, "}}")
        } else {
            write!(f, " }}")
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut open_media: Option<&str> = None;
        for rule in &self.rules {
            let media = rule.media.as_deref();
            if media != open_media {
                if open_media.is_some() {
                    writeln!(f, "}}")?;
                }
                if let Some(query) = media {
                    writeln!(f, "@media {} {{", query)?;
                }
                open_media = media;
            }
            match media {
                Some(_) => writeln!(f, "  {}", rule)?,
                None => writeln!(f, "{}", rule)?,
            }
        }
        if open_media.is_some() {
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}
