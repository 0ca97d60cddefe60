use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locale utilities for the vendor locale table
///
/// Queue entries carry the site's internal locale codes (e.g. `jp`); the
/// vendor expects its own identifiers (e.g. `ja-JP`). The table maps one to
/// the other before any job or upload request is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleTable(BTreeMap<String, String>);

impl Default for LocaleTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert("jp".to_string(), "ja-JP".to_string());
        Self(table)
    }
}

impl LocaleTable {
    /// Build a table from (internal, vendor) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (normalize_locale(&k.into()), v.into()))
                .collect(),
        )
    }

    /// Look up the vendor id for an internal locale code
    pub fn vendor_id(&self, locale: &str) -> Option<&str> {
        self.0.get(&normalize_locale(locale)).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Internal locale codes known to the table
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Normalize an internal locale code for table lookups
pub fn normalize_locale(locale: &str) -> String {
    locale.trim().to_lowercase()
}
