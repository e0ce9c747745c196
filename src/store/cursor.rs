use crate::document::Document;

/// Finite, single-pass result set, already ordered by the query's sort specs.
pub struct Cursor {
    docs: std::vec::IntoIter<Document>,
}

impl Cursor {
    #[must_use]
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs: docs.into_iter() }
    }

    /// Documents not yet yielded.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.docs.len()
    }
}

impl Iterator for Cursor {
    type Item = Document;
    fn next(&mut self) -> Option<Self::Item> {
        self.docs.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.docs.size_hint()
    }
}
