use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported selector syntax in '{0}'")]
    Unsupported(String),
}

/// Comma-separated list of compound selectors (`tag.class#id[attr="v"]`).
/// Combinators are not supported; the markup contract never needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Compound>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let compounds = selector
            .split(',')
            .map(|part| parse_compound(part.trim(), selector))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(compounds))
    }

    pub fn matches(
        &self,
        tag: &str,
        classes: &BTreeSet<String>,
        attributes: &BTreeMap<String, String>,
    ) -> bool {
        self.0.iter().any(|compound| {
            compound.tag.as_deref().map_or(true, |t| t.eq_ignore_ascii_case(tag))
                && compound
                    .id
                    .as_deref()
                    .map_or(true, |id| attributes.get("id").map(String::as_str) == Some(id))
                && compound.classes.iter().all(|c| classes.contains(c))
                && compound.attributes.iter().all(|(name, expected)| {
                    match (attributes.get(name), expected) {
                        (Some(_), None) => true,
                        (Some(actual), Some(expected)) => actual == expected,
                        (None, _) => false,
                    }
                })
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &str) -> (&str, &str) {
    let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    rest.split_at(end)
}

fn parse_compound(part: &str, whole: &str) -> Result<Compound, SelectorError> {
    if part.is_empty() {
        return Err(SelectorError::Empty);
    }
    let unsupported = || SelectorError::Unsupported(whole.to_string());

    let mut compound = Compound::default();
    let (tag, mut rest) = take_ident(part);
    if !tag.is_empty() {
        compound.tag = Some(tag.to_ascii_lowercase());
    }

    while let Some(marker) = rest.chars().next() {
        match marker {
            '.' | '#' => {
                let (ident, tail) = take_ident(&rest[1..]);
                if ident.is_empty() {
                    return Err(unsupported());
                }
                if marker == '.' {
                    compound.classes.push(ident.to_string());
                } else {
                    compound.id = Some(ident.to_string());
                }
                rest = tail;
            }
            '[' => {
                let close = rest.find(']').ok_or_else(unsupported)?;
                let body = &rest[1..close];
                let attribute = match body.split_once('=') {
                    Some((name, value)) => (
                        name.trim().to_string(),
                        Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()),
                    ),
                    None => (body.trim().to_string(), None),
                };
                if attribute.0.is_empty() {
                    return Err(unsupported());
                }
                compound.attributes.push(attribute);
                rest = &rest[close + 1..];
            }
            _ => return Err(unsupported()),
        }
    }

    Ok(compound)
}
