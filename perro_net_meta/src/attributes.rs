//! Attribute argument resolution.
//!
//! Arguments are read from the attribute instance attached to a member. The
//! interest mask uses a two-step fallback: the explicit argument is requested
//! with an impossible sentinel default, and when the sentinel comes back the
//! attribute class's own declared default initializer text is used verbatim.

use std::fmt;

use perro_net_types::WireSubtype;
use serde::Serialize;

use crate::{AttributeManifest, AttributeValue, MetadataProvider};

pub const NETWORK_PROPERTY: &str = "NetworkProperty";
pub const NETWORK_FUNCTION: &str = "NetworkFunction";

pub const INTEREST_MASK_ARG: &str = "InterestMask";
pub const SUBTYPE_ARG: &str = "Subtype";
pub const WITH_PEER_ARG: &str = "WithPeer";

/// Impossible interest mask, distinguishes "not supplied" from "supplied as 0".
pub const INTEREST_MASK_SENTINEL: i64 = -1;

pub trait FromAttributeValue: Sized {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self>;
}

impl FromAttributeValue for bool {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAttributeValue for i64 {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAttributeValue for f64 {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromAttributeValue for String {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttributeValue for AttributeValue {
    fn from_attribute_value(value: &AttributeValue) -> Option<Self> {
        Some(value.clone())
    }
}

pub fn find_attribute<'a>(
    attributes: &'a [AttributeManifest],
    attribute: &str,
) -> Option<&'a AttributeManifest> {
    attributes.iter().find(|a| a.is(attribute))
}

/// Explicitly supplied `argument` of `attribute`, or `default`. A value of
/// the wrong kind counts as not supplied.
pub fn resolve_argument<T: FromAttributeValue>(
    attributes: &[AttributeManifest],
    attribute: &str,
    argument: &str,
    default: T,
) -> T {
    let Some(value) = find_attribute(attributes, attribute).and_then(|a| a.args.get(argument))
    else {
        return default;
    };
    match T::from_attribute_value(value) {
        Some(v) => v,
        None => {
            log::warn!("{attribute}.{argument} = {value} has an unexpected type; using default");
            default
        }
    }
}

/// Raw default initializer text of `field` declared on the attribute class.
pub fn resolve_field_literal<P: MetadataProvider + ?Sized>(
    provider: &P,
    attribute: &str,
    field: &str,
) -> Option<String> {
    provider
        .attribute_field_literal(attribute, field)
        .map(|s| s.trim().to_string())
}

/// Interest mask of a property, in whichever form it was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InterestMask {
    /// Supplied as an attribute argument.
    Explicit(i64),
    /// Taken verbatim from the attribute class's field initializer.
    DefaultLiteral(String),
}

impl InterestMask {
    /// Numeric mask, evaluating default literals made of integer terms
    /// (`4`, `0x10`, `0b11`, `1 << 3`, `A | B` of those). `None` for
    /// anything that needs symbol resolution.
    pub fn value(&self) -> Option<i64> {
        match self {
            InterestMask::Explicit(v) => Some(*v),
            InterestMask::DefaultLiteral(text) => eval_mask_literal(text),
        }
    }
}

impl Default for InterestMask {
    fn default() -> Self {
        InterestMask::Explicit(0)
    }
}

impl fmt::Display for InterestMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterestMask::Explicit(v) => write!(f, "{v}"),
            InterestMask::DefaultLiteral(text) => f.write_str(text),
        }
    }
}

pub fn resolve_interest_mask<P: MetadataProvider + ?Sized>(
    provider: &P,
    attributes: &[AttributeManifest],
) -> InterestMask {
    let explicit = resolve_argument(
        attributes,
        NETWORK_PROPERTY,
        INTEREST_MASK_ARG,
        INTEREST_MASK_SENTINEL,
    );
    if explicit != INTEREST_MASK_SENTINEL {
        return InterestMask::Explicit(explicit);
    }
    match resolve_field_literal(provider, NETWORK_PROPERTY, INTEREST_MASK_ARG) {
        Some(literal) => InterestMask::DefaultLiteral(literal),
        None => InterestMask::default(),
    }
}

/// Explicit `Subtype` argument of `NetworkProperty`, by name or discriminant.
pub fn resolve_subtype_override(
    attributes: &[AttributeManifest],
) -> Result<Option<WireSubtype>, String> {
    let Some(value) = find_attribute(attributes, NETWORK_PROPERTY).and_then(|a| a.args.get(SUBTYPE_ARG))
    else {
        return Ok(None);
    };
    match value {
        AttributeValue::Str(s) => s.parse().map(Some),
        AttributeValue::Int(n) => u8::try_from(*n)
            .ok()
            .and_then(WireSubtype::from_u8)
            .map(Some)
            .ok_or_else(|| format!("unknown wire subtype `{n}`")),
        other => Err(format!("`Subtype = {other}` is not a subtype name")),
    }
}

pub fn resolve_with_peer(attributes: &[AttributeManifest]) -> bool {
    resolve_argument(attributes, NETWORK_FUNCTION, WITH_PEER_ARG, false)
}

fn eval_mask_literal(text: &str) -> Option<i64> {
    let mut mask = 0i64;
    for term in text.split('|') {
        mask |= eval_mask_term(term)?;
    }
    Some(mask)
}

fn eval_mask_term(term: &str) -> Option<i64> {
    let mut term = term.trim();
    while let Some(inner) = term.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        term = inner.trim();
    }
    if let Some((lhs, rhs)) = term.split_once("<<") {
        let shift = u32::try_from(eval_int(rhs)?).ok()?;
        return eval_int(lhs)?.checked_shl(shift);
    }
    eval_int(term)
}

fn eval_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let text = text.trim_end_matches(['L', 'l', 'U', 'u']).replace('_', "");
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}
