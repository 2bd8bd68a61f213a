use super::Column;
use crate::DocId;

/// A column of raw terms which does not carry a term dictionary.
///
/// Such columns cannot hand out ordinals, and they only know an upper bound of their number
/// of distinct terms.
#[derive(Clone, Debug)]
pub struct BytesColumn {
    terms: Column<Box<[u8]>>,
}

impl BytesColumn {
    /// Builds the column from the terms of each document.
    pub fn from_docs<B: AsRef<[u8]>>(docs: &[Vec<B>]) -> Self {
        let docs: Vec<Vec<Box<[u8]>>> = docs
            .iter()
            .map(|doc_terms| doc_terms.iter().map(|term| term.as_ref().into()).collect())
            .collect();
        BytesColumn {
            terms: Column::from_docs(&docs),
        }
    }

    /// Returns the terms of a document.
    #[inline]
    pub fn terms_for_doc(&self, doc: DocId) -> &[Box<[u8]>] {
        self.terms.values_for_doc(doc)
    }

    /// Number of stored terms, duplicates included.
    pub fn num_vals(&self) -> u32 {
        self.terms.num_vals()
    }
}
