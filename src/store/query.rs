use crate::document::Document;
use crate::keys::{Key, Kind};
use crate::query::{CompiledQuery, Predicate, SortSpec, compare_bson, eval_all, has_sort_value};
use bson::Bson;
use std::cmp::Ordering;

/// What the store should return: one kind, optionally under an ancestor,
/// filtered and ordered.
#[derive(Debug, Clone)]
pub struct EntityQuery {
    pub kind: Kind,
    pub ancestor: Option<Key>,
    pub predicates: Vec<Predicate>,
    /// Plain equality on any attribute (not client-filterable).
    pub equals: Vec<(String, Bson)>,
    pub order: Vec<SortSpec>,
    pub limit: Option<usize>,
}

impl EntityQuery {
    #[must_use]
    pub const fn kind(kind: Kind) -> Self {
        Self {
            kind,
            ancestor: None,
            predicates: Vec::new(),
            equals: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Consume a compiled client query.
    #[must_use]
    pub fn compiled(kind: Kind, compiled: CompiledQuery) -> Self {
        let (predicates, order) = compiled.into_parts();
        Self { predicates, order, ..Self::kind(kind) }
    }

    #[must_use]
    pub fn ancestor(mut self, key: &Key) -> Self {
        self.ancestor = Some(key.clone());
        self
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    #[must_use]
    pub fn eq(mut self, attribute: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.equals.push((attribute.into(), value.into()));
        self
    }

    #[must_use]
    pub fn order(mut self, spec: SortSpec) -> Self {
        self.order.push(spec);
        self
    }

    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        if doc.kind() != self.kind {
            return false;
        }
        if let Some(a) = &self.ancestor {
            if !doc.key.has_ancestor(a) {
                return false;
            }
        }
        let equals_ok = self.equals.iter().all(|(attr, want)| {
            doc.data.get(attr).is_some_and(|have| compare_bson(have, want) == Ordering::Equal)
        });
        equals_ok
            && eval_all(&doc.data, &self.predicates)
            && self.order.iter().all(|s| has_sort_value(&doc.data, &s.field))
    }
}
