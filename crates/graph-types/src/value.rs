use std::collections::BTreeMap;

use facet::Facet;

use crate::tag::TypeTag;

/// A tagged value, or `Unset` when a declared key has never been written.
///
/// `Unset` is a real variant, not the absence of a map entry — every
/// declared schema key is always present in a node's `data_in`/`data_out`
/// map, so downstream code can tell "never written" apart from "written
/// with a falsy value" by matching on the variant.
#[derive(Facet, Clone, Debug, PartialEq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    List(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    Unset,
}

impl Value {
    /// The tag this value would satisfy, or `None` for `Unset` (which
    /// satisfies any tag — it carries no payload to check).
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Value::Int(_) => Some(TypeTag::Int),
            Value::Float(_) => Some(TypeTag::Float),
            Value::Str(_) => Some(TypeTag::Str),
            Value::Bool(_) => Some(TypeTag::Bool),
            Value::List(_) => Some(TypeTag::List),
            Value::Dict(_) => Some(TypeTag::Dict),
            Value::Unset => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }
}
