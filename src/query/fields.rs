//! Static field and operator tables.
//!
//! These are the allow-lists for client filters. Adding a filterable field
//! means adding a row to [`FIELDS`].

use super::types::{FilterField, FilterOp};

/// How a filter value is typed before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: FilterField,
    /// Symbol clients send.
    pub symbol: &'static str,
    /// Stored article attribute.
    pub attribute: &'static str,
    pub kind: ValueKind,
}

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        field: FilterField::Author,
        symbol: "AUTHOR",
        attribute: "authorName",
        kind: ValueKind::String,
    },
    FieldSpec { field: FilterField::Tags, symbol: "TAGS", attribute: "tags", kind: ValueKind::String },
];

pub const OPERATORS: &[(&str, FilterOp)] = &[
    ("EQ", FilterOp::Eq),
    ("GT", FilterOp::Gt),
    ("GTEQ", FilterOp::Gte),
    ("LT", FilterOp::Lt),
    ("LTEQ", FilterOp::Lte),
    ("NE", FilterOp::Ne),
];

/// Secondary sort key of every compiled query.
pub const DEFAULT_SORT_FIELD: &str = "title";

#[must_use]
pub fn field_by_symbol(symbol: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.symbol == symbol)
}

#[must_use]
pub fn spec_for(field: FilterField) -> &'static FieldSpec {
    // Every FilterField variant has exactly one row.
    FIELDS.iter().find(|f| f.field == field).unwrap_or(&FIELDS[0])
}

#[must_use]
pub fn op_by_symbol(symbol: &str) -> Option<FilterOp> {
    OPERATORS.iter().find(|(s, _)| *s == symbol).map(|(_, op)| *op)
}
