// Submodules for separation of concerns
mod compile;
mod eval;
mod fields;
mod parse;
mod types;

// Public API re-exports
pub use compile::{coerce_value, compile, compile_with_default_sort};
pub use eval::{compare_bson, compare_docs, eval_all, eval_predicate, has_sort_value};
pub use fields::{
    DEFAULT_SORT_FIELD, FIELDS, FieldSpec, OPERATORS, ValueKind, field_by_symbol, op_by_symbol,
    spec_for,
};
pub use parse::{QueryForm, parse_query_json};
pub use types::{CompiledQuery, FilterField, FilterOp, FilterTriple, Order, Predicate, SortSpec};
