//! Operator search over an entity's natural-language fields.
//!
//! The query is split on whitespace. A row matches when **every** term is a
//! case-insensitive substring of **at least one** of its searchable fields.

use novelfinder_core::ValueObject;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<String>,
}

impl ValueObject for SearchTerms {}

impl SearchTerms {
    pub fn parse(query: &str) -> Self {
        Self {
            terms: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// Lower-cased terms, in query order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, fields: &[&str]) -> bool {
        let fields: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();
        self.terms
            .iter()
            .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
    }
}
