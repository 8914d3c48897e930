use std::collections::BTreeMap;

/// Reusable integer-to-label enumeration declared by `VAL_TABLE_`.
///
/// Signals reference a table by name; the inline `VAL_` form stores its
/// entries directly on the signal instead.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct ValueTableDBC {
    /// Table name.
    pub name: String,
    /// Ordered raw-value to label map.
    pub entries: BTreeMap<i64, String>,
}

impl ValueTableDBC {
    pub fn describe(&self, raw: i64) -> Option<&str> {
        self.entries.get(&raw).map(|s| s.as_str())
    }
}
