//! Product listing filter.
//!
//! Built from the raw query-string pairs of a listing request. Repeated
//! parameters are read as a list, never collapsed to their last occurrence:
//! `tags__name=A&tags__name=B` selects products tagged A **or** B.
//!
//! Criteria of different kinds combine with AND. A missing, empty or
//! whitespace-only value imposes no restriction, and unknown parameter names
//! are ignored.
//!
//! Text matching is case-insensitive. The Postgres backend is authoritative:
//! `ILIKE` folds case per the database collation, while the in-memory backend
//! uses Unicode lower-casing. Both agree on ASCII text.

use novelfinder_core::ValueObject;

use crate::search::SearchTerms;

/// Exact match on the related category's name.
pub const CATEGORY_NAME_PARAM: &str = "category__name";
/// Repeatable; a product matches if it carries any of the given tag names.
pub const TAG_NAME_PARAM: &str = "tags__name";
/// Case-insensitive substring match on the product description.
pub const DESCRIPTION_PARAM: &str = "description";
/// Free-text search over the description, the name the web frontend sends.
/// Split on whitespace; every word must appear, in any order.
pub const SEARCH_PARAM: &str = "search";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    category_name: Option<String>,
    tag_names: Vec<String>,
    description: Option<String>,
    search: SearchTerms,
}

impl ValueObject for ProductFilter {}

impl ProductFilter {
    /// A filter that selects every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from query-string pairs, in request order.
    ///
    /// `category__name`, `description` and `search` keep their last non-blank
    /// value. `description` takes precedence over `search` when both are given.
    /// Every non-blank `tags__name` value is kept, once, in first-seen order.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();
        let mut search = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                CATEGORY_NAME_PARAM => filter = filter.with_category(value),
                TAG_NAME_PARAM => filter = filter.with_tag(value),
                DESCRIPTION_PARAM => filter = filter.with_description(value),
                SEARCH_PARAM => {
                    if !value.trim().is_empty() {
                        search = Some(value.to_string());
                    }
                }
                _ => {}
            }
        }

        if filter.description.is_none() {
            if let Some(query) = search {
                filter = filter.with_search(&query);
            }
        }

        filter
    }

    /// Restrict to products whose category is named exactly `name`.
    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.category_name = Some(name);
        }
        self
    }

    /// Add a tag name to the OR-set.
    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() && !self.tag_names.contains(&name) {
            self.tag_names.push(name);
        }
        self
    }

    /// Restrict to products whose description contains `term` (trimmed),
    /// ignoring case.
    pub fn with_description(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        if !term.is_empty() {
            self.description = Some(term.to_string());
        }
        self
    }

    /// Restrict to products whose description contains every word of
    /// `query`, ignoring case and word order.
    pub fn with_search(mut self, query: &str) -> Self {
        let terms = SearchTerms::parse(query);
        if !terms.is_empty() {
            self.search = terms;
        }
        self
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category_name.as_deref()
    }

    pub fn tag_names(&self) -> &[String] {
        &self.tag_names
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn search_terms(&self) -> &SearchTerms {
        &self.search
    }

    /// True when no criterion is set.
    pub fn is_unrestricted(&self) -> bool {
        self.category_name.is_none()
            && self.tag_names.is_empty()
            && self.description.is_none()
            && self.search.is_empty()
    }

    pub fn matches_category(&self, category_name: &str) -> bool {
        self.category_name
            .as_deref()
            .is_none_or(|wanted| wanted == category_name)
    }

    pub fn matches_tags<'a, I>(&self, tag_names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.tag_names.is_empty() {
            return true;
        }
        tag_names
            .into_iter()
            .any(|name| self.tag_names.iter().any(|wanted| wanted == name))
    }

    pub fn matches_description(&self, description: &str) -> bool {
        let phrase = match self.description.as_deref() {
            None => true,
            Some(term) => description.to_lowercase().contains(&term.to_lowercase()),
        };
        phrase && self.search.matches(&[description])
    }

    /// Evaluate every criterion against one product's fields.
    pub fn matches<'a, I>(&self, category_name: &str, tag_names: I, description: &str) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.matches_category(category_name)
            && self.matches_description(description)
            && self.matches_tags(tag_names)
    }
}
