use bson::Bson;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inbound filter as the client sent it; symbols are resolved by `compile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTriple {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterTriple {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), operator: operator.into(), value: value.into() }
    }
}

/// Filterable article fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    Author,
    Tags,
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Author => "AUTHOR",
            Self::Tags => "TAGS",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
}

impl FilterOp {
    /// Everything except equality constrains the index to a range.
    #[must_use]
    pub const fn is_inequality(self) -> bool {
        !matches!(self, Self::Eq)
    }

    #[must_use]
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: FilterField,
    /// Stored attribute the predicate reads.
    pub attribute: &'static str,
    pub op: FilterOp,
    pub value: Bson,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.op.as_symbol(), self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: Order::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: Order::Desc }
    }
}

/// Validated predicates plus the sort order the index requires.
///
/// At most one field carries inequality predicates; when one does, it is the
/// first sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) inequality_field: Option<FilterField>,
    pub(crate) order: Vec<SortSpec>,
}

impl CompiledQuery {
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub const fn inequality_field(&self) -> Option<FilterField> {
        self.inequality_field
    }

    #[must_use]
    pub fn order(&self) -> &[SortSpec] {
        &self.order
    }

    /// Primary sort field (the inequality attribute, or the default field).
    #[must_use]
    pub fn primary_sort(&self) -> Option<&str> {
        self.order.first().map(|s| s.field.as_str())
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Predicate>, Vec<SortSpec>) {
        (self.predicates, self.order)
    }
}
