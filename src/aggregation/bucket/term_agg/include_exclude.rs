use regex::bytes::Regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// An include or exclude parameter of a terms aggregation request.
#[derive(Clone, Debug, PartialEq)]
pub enum IncludeExcludeParam {
    /// A single string pattern is treated as regex.
    Regex(String),
    /// An array of strings is treated as exact values.
    Values(Vec<String>),
}

impl Serialize for IncludeExcludeParam {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: serde::Serializer {
        match self {
            IncludeExcludeParam::Regex(s) => serializer.serialize_str(s),
            IncludeExcludeParam::Values(v) => v.serialize(serializer),
        }
    }
}

// Custom deserializer to accept either a single string (regex) or an array of strings (values).
impl<'de> Deserialize<'de> for IncludeExcludeParam {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: serde::Deserializer<'de> {
        use serde::de::{self, SeqAccess, Visitor};
        struct IncludeExcludeVisitor;

        impl<'de> Visitor<'de> for IncludeExcludeVisitor {
            type Value = IncludeExcludeParam;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string (regex) or an array of strings")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where E: de::Error {
                Ok(IncludeExcludeParam::Regex(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where E: de::Error {
                Ok(IncludeExcludeParam::Regex(v))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where A: SeqAccess<'de> {
                let mut values: Vec<String> = Vec::new();
                while let Some(elem) = seq.next_element::<String>()? {
                    values.push(elem);
                }
                Ok(IncludeExcludeParam::Values(values))
            }
        }

        deserializer.deserialize_any(IncludeExcludeVisitor)
    }
}

#[derive(Clone, Debug)]
enum TermMatcher {
    /// Must match the whole term.
    Regex(Regex),
    Values(FxHashSet<Box<[u8]>>),
}

impl TermMatcher {
    fn from_param(param: &IncludeExcludeParam) -> crate::Result<Self> {
        match param {
            IncludeExcludeParam::Regex(pattern) => {
                let regex = Regex::new(&format!("^(?:{pattern})$"))?;
                Ok(TermMatcher::Regex(regex))
            }
            IncludeExcludeParam::Values(values) => Ok(TermMatcher::Values(
                values
                    .iter()
                    .map(|value| value.as_bytes().into())
                    .collect(),
            )),
        }
    }

    fn matches(&self, term: &[u8]) -> bool {
        match self {
            TermMatcher::Regex(regex) => regex.is_match(term),
            TermMatcher::Values(values) => values.contains(term),
        }
    }
}

/// A filter over the terms of a terms aggregation.
///
/// A term is accepted if it matches the include part (when present) and does not match the
/// exclude part (when present).
#[derive(Clone, Debug)]
pub struct IncludeExclude {
    include: Option<TermMatcher>,
    exclude: Option<TermMatcher>,
}

impl IncludeExclude {
    /// Compiles the filter. Returns `None` when neither include nor exclude is set.
    pub fn new(
        include: Option<&IncludeExcludeParam>,
        exclude: Option<&IncludeExcludeParam>,
    ) -> crate::Result<Option<Self>> {
        if include.is_none() && exclude.is_none() {
            return Ok(None);
        }
        Ok(Some(IncludeExclude {
            include: include.map(TermMatcher::from_param).transpose()?,
            exclude: exclude.map(TermMatcher::from_param).transpose()?,
        }))
    }

    /// Returns true if the term passes the filter.
    pub fn accepts(&self, term: &[u8]) -> bool {
        if let Some(include) = &self.include {
            if !include.matches(term) {
                return false;
            }
        }
        match &self.exclude {
            Some(exclude) => !exclude.matches(term),
            None => true,
        }
    }
}
