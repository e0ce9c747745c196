use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{FilterOp, Order, Predicate, SortSpec};

/// Datastore semantics: a missing attribute never matches, and a repeated
/// attribute matches when any one of its elements does.
#[must_use]
pub fn eval_predicate(doc: &BsonDocument, pred: &Predicate) -> bool {
    match doc.get(pred.attribute) {
        None | Some(Bson::Null) => false,
        Some(Bson::Array(items)) => items.iter().any(|v| matches_value(v, pred.op, &pred.value)),
        Some(v) => matches_value(v, pred.op, &pred.value),
    }
}

#[must_use]
pub fn eval_all(doc: &BsonDocument, preds: &[Predicate]) -> bool {
    preds.iter().all(|p| eval_predicate(doc, p))
}

fn matches_value(v: &Bson, op: FilterOp, target: &Bson) -> bool {
    let c = compare_bson(v, target);
    match op {
        FilterOp::Eq => c == Ordering::Equal,
        FilterOp::Ne => c != Ordering::Equal,
        FilterOp::Gt => c == Ordering::Greater,
        FilterOp::Gte => c != Ordering::Less,
        FilterOp::Lt => c == Ordering::Less,
        FilterOp::Lte => c != Ordering::Greater,
    }
}

/// Whether `doc` has a value to sort on for `field`. A missing attribute or
/// an empty repeated one has none, and such documents drop out of ordered
/// queries the way they are absent from the datastore's sort index.
#[must_use]
pub fn has_sort_value(doc: &BsonDocument, field: &str) -> bool {
    sort_value(doc.get(field), Order::Asc).is_some()
}

/// Order two documents by the sort specs, first differing key wins.
///
/// A document with no value for a key sorts before one that has it. Stores
/// filter such documents out with [`has_sort_value`] before sorting.
#[must_use]
pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort {
        let va = sort_value(a.get(&s.field), s.order);
        let vb = sort_value(b.get(&s.field), s.order);
        let ord = match (va, vb) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if s.order == Order::Asc { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

// A repeated attribute sorts by its smallest element ascending, largest descending.
fn sort_value(v: Option<&Bson>, order: Order) -> Option<&Bson> {
    match v {
        Some(Bson::Array(items)) => {
            let it = items.iter();
            match order {
                Order::Asc => it.min_by(|x, y| compare_bson(x, y)),
                Order::Desc => it.max_by(|x, y| compare_bson(x, y)),
            }
        }
        other => other,
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    use bson::Bson as T;
    fn as_f64_num(x: &T) -> Option<f64> {
        match x {
            T::Int32(i) => Some(f64::from(*i)),
            T::Int64(i) => Some(*i as f64),
            T::Double(f) => Some(*f),
            _ => None,
        }
    }
    if let (T::Int64(x), T::Int64(y)) = (a, b) {
        return x.cmp(y);
    }
    if let (Some(x), Some(y)) = (as_f64_num(a), as_f64_num(b)) {
        return x.total_cmp(&y);
    }
    match (a, b) {
        (T::String(x), T::String(y)) => x.cmp(y),
        (T::Boolean(x), T::Boolean(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Bson) -> u8 {
    use bson::Bson as T;
    match v {
        T::Null => 0,
        T::Int32(_) | T::Int64(_) | T::Double(_) => 1,
        T::String(_) => 2,
        T::Boolean(_) => 3,
        T::Array(_) => 4,
        T::Document(_) => 5,
        _ => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterField;
    use bson::doc;

    fn pred(attribute: &'static str, op: FilterOp, value: impl Into<Bson>) -> Predicate {
        Predicate { field: FilterField::Tags, attribute, op, value: value.into() }
    }

    #[test]
    fn repeated_attribute_matches_any_element() {
        let d = doc! {"tags": ["fraud", "theft"]};
        assert!(eval_predicate(&d, &pred("tags", FilterOp::Eq, "theft")));
        assert!(!eval_predicate(&d, &pred("tags", FilterOp::Eq, "arson")));
        assert!(eval_predicate(&d, &pred("tags", FilterOp::Gt, "g")));
        assert!(!eval_predicate(&d, &pred("tags", FilterOp::Gt, "z")));
    }

    #[test]
    fn missing_or_empty_attribute_never_matches() {
        let d = doc! {"title": "x", "tags": []};
        assert!(!eval_predicate(&d, &pred("authorName", FilterOp::Ne, "anyone")));
        assert!(!eval_predicate(&d, &pred("tags", FilterOp::Ne, "anything")));
    }

    #[test]
    fn numeric_compare_crosses_widths() {
        let d = doc! {"n": 5i32};
        assert!(eval_predicate(&d, &pred("n", FilterOp::Gte, Bson::Int64(5))));
        assert!(eval_predicate(&d, &pred("n", FilterOp::Lt, 5.5f64)));
    }

    #[test]
    fn sort_uses_min_element_of_lists_ascending() {
        let a = doc! {"tags": ["z", "b"], "title": "A"};
        let b = doc! {"tags": ["c"], "title": "B"};
        let sort = [SortSpec::asc("tags"), SortSpec::asc("title")];
        assert_eq!(compare_docs(&a, &b, &sort), Ordering::Less);
        let sort_desc = [SortSpec::desc("tags")];
        assert_eq!(compare_docs(&a, &b, &sort_desc), Ordering::Less);
    }

    #[test]
    fn ties_fall_through_to_next_key() {
        let a = doc! {"authorName": "dan", "title": "b"};
        let b = doc! {"authorName": "dan", "title": "a"};
        let sort = [SortSpec::asc("authorName"), SortSpec::asc("title")];
        assert_eq!(compare_docs(&a, &b, &sort), Ordering::Greater);
    }

    #[test]
    fn missing_sort_value_sorts_first_and_is_reported() {
        let with = doc! {"title": "a"};
        let without = doc! {"tags": []};
        assert!(has_sort_value(&with, "title"));
        assert!(!has_sort_value(&without, "title"));
        assert!(!has_sort_value(&without, "tags"));
        let asc = [SortSpec::asc("title")];
        assert_eq!(compare_docs(&without, &with, &asc), Ordering::Less);
    }
}
