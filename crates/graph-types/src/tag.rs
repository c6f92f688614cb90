use facet::Facet;

/// Closed set of value shapes a schema key can declare.
///
/// Two tags are compatible iff equal — there is no subtyping and no numeric
/// widening between `int` and `float`.
#[derive(Facet, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum TypeTag {
    Int,
    Float,
    Str,
    Bool,
    List,
    Dict,
}
