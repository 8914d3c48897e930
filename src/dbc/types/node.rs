use crate::dbc::types::attributes::AttributeValue;
use std::collections::BTreeMap;

/// Placeholder node name used by DBC files for "no real ECU".
pub const VECTOR_XXX: &str = "Vector__XXX";

/// ECU/node declared by a `BU_` line.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct NodeDBC {
    /// Node name.
    pub name: String,
    /// Associated comment (DBC `CM_ BU_` section).
    pub comment: String,

    // --- Node Attribute Entry ---
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl NodeDBC {
    /// Resets all fields to their default values.
    pub fn clear(&mut self) {
        *self = NodeDBC::default();
    }
}
