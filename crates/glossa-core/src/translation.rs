//! Lookup request and result types.

/// A validated translation lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub site_id: i64,
    pub language: String,
    /// Keys in the order the caller supplied them. May contain duplicates.
    pub keys: Vec<String>,
}

/// One row returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRow {
    pub name: String,
    pub value: String,
}

/// The resolved value for one requested key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTranslation {
    pub name: String,
    pub value: String,
    /// `true` when `value` is a synthesized placeholder.
    pub is_fallback: bool,
}

impl ResolvedTranslation {
    /// An authoritative value taken from a store row.
    pub fn hit(row: TranslationRow) -> Self {
        Self {
            name: row.name,
            value: row.value,
            is_fallback: false,
        }
    }

    /// A placeholder for a key the store does not have.
    pub fn fallback(request: &LookupRequest, key: &str) -> Self {
        Self {
            name: key.to_string(),
            value: fallback_value(&request.language, request.site_id, key),
            is_fallback: true,
        }
    }
}

/// Placeholder text for a missing key: `[<lang>:<site>][<key>]`, language lowercased.
pub fn fallback_value(language: &str, site_id: i64, key: &str) -> String {
    format!("[{}:{site_id}][{key}]", language.to_lowercase())
}
