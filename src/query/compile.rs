use crate::devlog;
use crate::errors::ArchiveError;
use crate::telemetry;
use bson::Bson;
use serde_json::json;

use super::fields::{DEFAULT_SORT_FIELD, FieldSpec, ValueKind, field_by_symbol, op_by_symbol, spec_for};
use super::types::{CompiledQuery, FilterField, FilterTriple, Predicate, SortSpec};

pub(crate) const INVALID_FIELD_OR_OPERATOR: &str = "Filter contains invalid field or operator.";
pub(crate) const ONE_INEQUALITY_FIELD: &str = "Inequality filter is allowed on only one field.";

/// Compile client filters into predicates sorted by title.
///
/// # Errors
/// `InvalidFilter` for an unknown field or operator, a value that does not fit
/// the field's type, or inequalities on more than one field.
pub fn compile(triples: &[FilterTriple]) -> Result<CompiledQuery, ArchiveError> {
    compile_with_default_sort(triples, DEFAULT_SORT_FIELD)
}

/// Same as [`compile`] with a caller-chosen secondary sort field.
///
/// # Errors
/// See [`compile`].
pub fn compile_with_default_sort(
    triples: &[FilterTriple],
    default_sort: &str,
) -> Result<CompiledQuery, ArchiveError> {
    let mut predicates = Vec::with_capacity(triples.len());
    let mut inequality_field: Option<FilterField> = None;

    for t in triples {
        let (Some(spec), Some(op)) = (field_by_symbol(&t.field), op_by_symbol(&t.operator)) else {
            log::warn!("rejected filter field={:?} operator={:?}", t.field, t.operator);
            telemetry::note_rejected_filter();
            return Err(ArchiveError::InvalidFilter(INVALID_FIELD_OR_OPERATOR.into()));
        };

        // First inequality wins; later ones must target the same field.
        if op.is_inequality() {
            match inequality_field {
                Some(seen) if seen != spec.field => {
                    log::warn!("rejected second inequality field {} (already {seen})", spec.field);
                    telemetry::note_rejected_filter();
                    return Err(ArchiveError::InvalidFilter(ONE_INEQUALITY_FIELD.into()));
                }
                _ => inequality_field = Some(spec.field),
            }
        }

        let value = coerce_value(spec, &t.value).inspect_err(|_| telemetry::note_rejected_filter())?;
        predicates.push(Predicate { field: spec.field, attribute: spec.attribute, op, value });
    }

    let mut order = Vec::with_capacity(2);
    if let Some(field) = inequality_field {
        order.push(SortSpec::asc(spec_for(field).attribute));
    }
    if order.first().is_none_or(|s| s.field != default_sort) {
        order.push(SortSpec::asc(default_sort));
    }

    devlog::trace(
        "compile",
        json!({
            "predicates": predicates.len(),
            "inequality": inequality_field.map(|f| f.to_string()),
            "sort": order.iter().map(|s| s.field.as_str()).collect::<Vec<_>>(),
        }),
    );
    log::debug!("compiled {} filters, inequality field {inequality_field:?}", predicates.len());

    Ok(CompiledQuery { predicates, inequality_field, order })
}

/// Type a raw filter value by the field table.
///
/// # Errors
/// `InvalidFilter` when an integer field gets a non-integer value.
pub fn coerce_value(spec: &FieldSpec, raw: &str) -> Result<Bson, ArchiveError> {
    match spec.kind {
        ValueKind::String => Ok(Bson::String(raw.to_string())),
        ValueKind::Integer => raw.trim().parse::<i64>().map(Bson::Int64).map_err(|_| {
            ArchiveError::InvalidFilter(format!(
                "Filter value '{raw}' is not an integer for field {}.",
                spec.symbol
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterOp, Order};

    fn t(field: &str, op: &str, value: &str) -> FilterTriple {
        FilterTriple::new(field, op, value)
    }

    #[test]
    fn no_filters_sorts_by_title() {
        let q = compile(&[]).unwrap();
        assert!(q.predicates().is_empty());
        assert_eq!(q.inequality_field(), None);
        assert_eq!(q.order(), &[SortSpec::asc("title")]);
    }

    #[test]
    fn equality_only_keeps_default_sort() {
        let q = compile(&[t("AUTHOR", "EQ", "dan"), t("TAGS", "EQ", "theft")]).unwrap();
        assert_eq!(q.predicates().len(), 2);
        assert_eq!(q.predicates()[0].attribute, "authorName");
        assert_eq!(q.predicates()[1].value, Bson::String("theft".into()));
        assert_eq!(q.primary_sort(), Some("title"));
    }

    #[test]
    fn inequality_field_sorts_first() {
        let q = compile(&[t("AUTHOR", "EQ", "x"), t("TAGS", "GT", "5")]).unwrap();
        assert_eq!(q.inequality_field(), Some(FilterField::Tags));
        assert_eq!(q.order(), &[SortSpec::asc("tags"), SortSpec::asc("title")]);
        assert!(q.order().iter().all(|s| s.order == Order::Asc));
    }

    #[test]
    fn second_inequality_field_is_rejected() {
        let err = compile(&[t("TAGS", "LT", "m"), t("AUTHOR", "NE", "x")]).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidFilter(ref m) if m == ONE_INEQUALITY_FIELD));
    }

    #[test]
    fn repeated_inequality_on_same_field_is_accepted() {
        let q = compile(&[t("TAGS", "GTEQ", "a"), t("TAGS", "EQ", "b"), t("TAGS", "LTEQ", "m")]).unwrap();
        assert_eq!(q.predicates().len(), 3);
        assert_eq!(q.predicates()[2].op, FilterOp::Lte);
        assert_eq!(q.inequality_field(), Some(FilterField::Tags));
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        for (f, o) in [("CITY", "EQ"), ("AUTHOR", "LIKE"), ("tags", "EQ"), ("", "")] {
            let err = compile(&[t(f, o, "v")]).unwrap_err();
            assert!(matches!(err, ArchiveError::InvalidFilter(ref m) if m == INVALID_FIELD_OR_OPERATOR));
        }
    }

    #[test]
    fn a_bad_triple_anywhere_fails_the_whole_call() {
        let err = compile(&[t("AUTHOR", "EQ", "x"), t("AUTHOR", "EQ", "y"), t("NOPE", "EQ", "z")]);
        assert!(err.is_err());
    }

    #[test]
    fn integer_fields_parse_values() {
        let spec = FieldSpec {
            field: FilterField::Tags,
            symbol: "COUNT",
            attribute: "count",
            kind: ValueKind::Integer,
        };
        assert_eq!(coerce_value(&spec, " 12 ").unwrap(), Bson::Int64(12));
        assert!(matches!(coerce_value(&spec, "twelve"), Err(ArchiveError::InvalidFilter(_))));
    }

    #[test]
    fn custom_default_sort_field() {
        let q = compile_with_default_sort(&[t("AUTHOR", "GT", "m")], "dateCreated").unwrap();
        assert_eq!(q.order(), &[SortSpec::asc("authorName"), SortSpec::asc("dateCreated")]);
        let q = compile_with_default_sort(&[t("AUTHOR", "GT", "m")], "authorName").unwrap();
        assert_eq!(q.order(), &[SortSpec::asc("authorName")]);
    }

    #[test]
    fn compile_traces_its_plan() {
        let cap = crate::devlog::capture();
        compile(&[t("TAGS", "NE", "x")]).unwrap();
        let traces = cap.take();
        assert_eq!(
            traces,
            vec![serde_json::json!({
                "event": "compile",
                "predicates": 1,
                "inequality": "TAGS",
                "sort": ["tags", "title"],
            })]
        );
    }
}
