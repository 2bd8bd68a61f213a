/// A sorted term dictionary. The ordinal of a term is its rank in the dictionary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
    terms: Vec<String>,
}

impl Dictionary {
    /// Creates a dictionary, sorting and deduplicating the given terms.
    pub fn from_terms<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        let mut terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        terms.sort_unstable();
        terms.dedup();
        Dictionary { terms }
    }

    /// Number of terms in the dictionary.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Returns the ordinal of a term, if present.
    pub fn term_ord(&self, term: &str) -> Option<u64> {
        self.terms
            .binary_search_by(|probe| probe.as_str().cmp(term))
            .ok()
            .map(|ord| ord as u64)
    }

    /// Returns the term associated to a given ordinal.
    pub fn ord_to_str(&self, ord: u64) -> Option<&str> {
        self.terms.get(ord as usize).map(String::as_str)
    }

    /// Iterates over `(ordinal, term)` in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> + '_ {
        self.terms
            .iter()
            .enumerate()
            .map(|(ord, term)| (ord as u64, term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_ords_follow_term_order() {
        let dictionary = Dictionary::from_terms(["termc", "terma", "termb", "terma"]);
        assert_eq!(dictionary.num_terms(), 3);
        assert_eq!(dictionary.term_ord("terma"), Some(0));
        assert_eq!(dictionary.term_ord("termc"), Some(2));
        assert_eq!(dictionary.term_ord("termd"), None);
        assert_eq!(dictionary.ord_to_str(1), Some("termb"));
        assert_eq!(dictionary.ord_to_str(3), None);
    }
}
