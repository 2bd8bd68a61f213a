use std::collections::BTreeSet;
use std::sync::Arc;

use super::{Column, Dictionary};
use crate::DocId;

/// A dictionary encoded string column.
///
/// Each document stores term ordinals. Ordinals are dense and local to the segment.
#[derive(Clone, Debug)]
pub struct StrColumn {
    dictionary: Arc<Dictionary>,
    term_ord_column: Column<u64>,
}

impl StrColumn {
    /// Builds the column from the terms of each document.
    pub fn from_docs<S: AsRef<str>>(docs: &[Vec<S>]) -> Self {
        let terms: BTreeSet<&str> = docs.iter().flatten().map(AsRef::as_ref).collect();
        let dictionary = Dictionary::from_terms(terms);
        let ords: Vec<Vec<u64>> = docs
            .iter()
            .map(|doc_terms| {
                doc_terms
                    .iter()
                    .filter_map(|term| dictionary.term_ord(term.as_ref()))
                    .collect()
            })
            .collect();
        StrColumn {
            dictionary: Arc::new(dictionary),
            term_ord_column: Column::from_docs(&ords),
        }
    }

    /// The term dictionary of the column.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The column of term ordinals.
    pub fn ords(&self) -> &Column<u64> {
        &self.term_ord_column
    }

    /// Returns the term ordinals of a document.
    #[inline]
    pub fn term_ords(&self, doc: DocId) -> &[u64] {
        self.term_ord_column.values_for_doc(doc)
    }
}
