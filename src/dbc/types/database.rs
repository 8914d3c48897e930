//! DatabaseDBC model (SlotMap-backed).
//!
//! This module defines the in-memory **CAN database** built by the DBC parser.
//! Nodes and messages live in **SlotMap** arenas with **stable keys**
//! ([`NodeKey`], [`MessageKey`]); messages own their signals directly.
//! Public iteration follows **order vectors** via `iter_nodes()` /
//! `iter_messages()`, reorderable with `sort_db_nodes_by_name()` /
//! `sort_db_messages_by_name()`.
//!
//! **Lookups** are normalized and O(1): `get_message_by_id/_hex/_name`,
//! `get_node_by_name`. Names are case-insensitive; hexadecimal IDs use the
//! uppercase `0x...` form. Cross-references (receivers, value-table and
//! signal-group members) are stored by name and resolved here at use time.

use slotmap::{SlotMap, new_key_type};
use std::collections::{BTreeMap, HashMap};

use crate::dbc::types::{
    attributes::{AttrLiteral, AttrObject, AttributeDef, AttributeSpec, AttributeValue},
    env_var::EnvVarDBC,
    errors::DatabaseError,
    message::{IdFormat, MessageDBC, MuxRole},
    node::NodeDBC,
    signal::SignalDBC,
    value_table::ValueTableDBC,
};

// --- Stable keys (SlotMap) ---
new_key_type! { pub struct NodeKey; }
new_key_type! { pub struct MessageKey; }

const CAN_SFF_MASK: u32 = 0x7FF; // 11 bit
const CAN_EFF_MASK: u32 = 0x1FFF_FFFF; // 29 bit
const CAN_EFF_FLAG: u32 = 0x8000_0000; // "extended" flag, SocketCAN style

/// Network bit timing from the `BS_` section. All zero when the section is
/// present but empty (the common case in modern files).
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct BitTiming {
    pub baudrate: u32,
    pub btr1: u32,
    pub btr2: u32,
}

/// In-memory representation of a CAN database (DBC).
///
/// Holds metadata (name, version, comment, new symbols, bit timing), the
/// arenas of nodes/messages, value tables, environment variables, attribute
/// specifications per object scope, and normalized lookup maps.
#[derive(Default, Clone, Debug)]
pub struct DatabaseDBC {
    // --- General information ---
    /// Database name (from the `BA_ "DBName"` network attribute, when present).
    pub name: String,
    /// `VERSION` string.
    pub version: String,
    /// Network comment (`CM_` with no target).
    pub comment: String,
    /// Tokens from the `NS_` block, in file order.
    pub new_symbols: Vec<String>,
    /// `BS_` content, when the section was present.
    pub bit_timing: Option<BitTiming>,

    // --- Main storage (stable-key maps) ---
    pub nodes: SlotMap<NodeKey, NodeDBC>,
    pub messages: SlotMap<MessageKey, MessageDBC>,

    // --- Order "views" ---
    pub nodes_order: Vec<NodeKey>,
    pub messages_order: Vec<MessageKey>,

    // --- Named collections ---
    pub value_tables: BTreeMap<String, ValueTableDBC>,
    pub env_vars: BTreeMap<String, EnvVarDBC>,

    // --- Network Attribute Entry ---
    pub attributes: BTreeMap<String, AttributeValue>,

    // --- Attribute Specs (per object scope) ---
    pub db_attr_spec: BTreeMap<String, AttributeSpec>,
    pub node_attr_spec: BTreeMap<String, AttributeSpec>,
    pub msg_attr_spec: BTreeMap<String, AttributeSpec>,
    pub sig_attr_spec: BTreeMap<String, AttributeSpec>,
    pub ev_attr_spec: BTreeMap<String, AttributeSpec>,

    // --- Lookups (case-normalized) ---
    pub(crate) node_key_by_name: HashMap<String, NodeKey>, // lower(name) → NodeKey
    pub(crate) msg_key_by_id: HashMap<u32, MessageKey>,    // id10 → MessageKey
    pub(crate) msg_key_by_hex: HashMap<String, MessageKey>, // "0x..." uppercase → MessageKey
    pub(crate) msg_key_by_name: HashMap<String, MessageKey>, // lower(name) → MessageKey

    // Parsing state: last message seen (used by the SG_ folding)
    pub(crate) current_msg: Option<MessageKey>,
}

impl DatabaseDBC {
    // --------- Nodes --------
    /// Adds a node, failing on a duplicate name (`BU_` declarations).
    pub fn add_node(&mut self, name: &str) -> Result<NodeKey, DatabaseError> {
        if self.get_node_key_by_name(name).is_some() {
            return Err(DatabaseError::NodeAlreadyExists {
                name: name.to_string(),
            });
        }
        Ok(self.insert_node(name))
    }

    /// Adds a node if not already present and returns the corresponding key.
    /// Used for senders named only in a `BO_` header.
    pub fn add_node_if_absent(&mut self, name: &str) -> NodeKey {
        if let Some(k) = self.get_node_key_by_name(name) {
            return k;
        }
        self.insert_node(name)
    }

    fn insert_node(&mut self, name: &str) -> NodeKey {
        let key: NodeKey = self.nodes.insert(NodeDBC {
            name: name.to_string(),
            ..Default::default()
        });
        self.nodes_order.push(key);
        self.node_key_by_name.insert(name.to_lowercase(), key);
        key
    }

    pub fn get_node_key_by_name(&self, name: &str) -> Option<NodeKey> {
        self.node_key_by_name.get(&name.to_lowercase()).copied()
    }

    pub fn get_node_by_key(&self, key: NodeKey) -> Option<&NodeDBC> {
        self.nodes.get(key)
    }

    pub fn get_node_by_key_mut(&mut self, key: NodeKey) -> Option<&mut NodeDBC> {
        self.nodes.get_mut(key)
    }

    /// Returns a `&NodeDBC` given the name (case-insensitive).
    pub fn get_node_by_name(&self, name: &str) -> Option<&NodeDBC> {
        let key: NodeKey = self.get_node_key_by_name(name)?;
        self.get_node_by_key(key)
    }

    /// Returns a `&mut NodeDBC` given the name (case-insensitive).
    pub fn get_node_by_name_mut(&mut self, name: &str) -> Option<&mut NodeDBC> {
        let key: NodeKey = self.get_node_key_by_name(name)?;
        self.get_node_by_key_mut(key)
    }

    // ------------- Messages ------------
    /// Normalized `"0x..."` uppercase form of a CAN id, extended flag removed.
    pub fn id_to_hex(raw: u32) -> String {
        let id29: u32 = raw & CAN_EFF_MASK;
        let is_ext: bool = (raw & CAN_EFF_FLAG) != 0 || id29 > CAN_SFF_MASK;
        let id_hex: u32 = if is_ext { id29 } else { id29 & CAN_SFF_MASK };
        format!("0x{:X}", id_hex)
    }

    /// Adds a message and indexes its id/name, failing on a duplicate id.
    /// Also sets `current_msg` for subsequent `SG_` lines and registers the
    /// sender node if it was not declared.
    pub fn add_message(
        &mut self,
        id: u32,
        name: &str,
        byte_length: u16,
        sender: &str,
    ) -> Result<MessageKey, DatabaseError> {
        if self.msg_key_by_id.contains_key(&id) {
            return Err(DatabaseError::MessageIdAlreadyAssigned { id });
        }

        if !sender.is_empty() && sender != crate::dbc::types::node::VECTOR_XXX {
            self.add_node_if_absent(sender);
        }

        let id_hex: String = Self::id_to_hex(id);
        let id_format: IdFormat = if (id & CAN_EFF_FLAG) != 0 || (id & CAN_EFF_MASK) > CAN_SFF_MASK
        {
            IdFormat::Extended
        } else {
            IdFormat::Standard
        };

        let msg_key: MessageKey = self.messages.insert(MessageDBC {
            id_format,
            id,
            id_hex: id_hex.clone(),
            name: name.to_string(),
            byte_length,
            msgtype: if byte_length <= 8 {
                "CAN".into()
            } else {
                "CAN FD".into()
            },
            sender: sender.to_string(),
            ..Default::default()
        });

        self.messages_order.push(msg_key);
        self.msg_key_by_id.insert(id, msg_key);
        self.msg_key_by_hex.insert(id_hex, msg_key);
        self.msg_key_by_name.insert(name.to_lowercase(), msg_key);

        self.current_msg = Some(msg_key);
        Ok(msg_key)
    }

    pub fn get_msg_key_by_name(&self, name: &str) -> Option<MessageKey> {
        self.msg_key_by_name.get(&name.to_lowercase()).copied()
    }

    pub fn get_msg_key_by_id(&self, id: u32) -> Option<MessageKey> {
        self.msg_key_by_id.get(&id).copied()
    }

    pub fn get_message_by_key(&self, key: MessageKey) -> Option<&MessageDBC> {
        self.messages.get(key)
    }

    pub fn get_message_by_key_mut(&mut self, key: MessageKey) -> Option<&mut MessageDBC> {
        self.messages.get_mut(key)
    }

    /// Returns a `&MessageDBC` given the numeric CAN ID.
    pub fn get_message_by_id(&self, id: u32) -> Option<&MessageDBC> {
        let key: MessageKey = self.get_msg_key_by_id(id)?;
        self.get_message_by_key(key)
    }

    /// Returns a `&mut MessageDBC` given the numeric CAN ID.
    pub fn get_message_by_id_mut(&mut self, id: u32) -> Option<&mut MessageDBC> {
        let key: MessageKey = self.get_msg_key_by_id(id)?;
        self.get_message_by_key_mut(key)
    }

    /// Returns a `&MessageDBC` given a normalized hexadecimal ID.
    pub fn get_message_by_id_hex(&self, id_hex: &str) -> Option<&MessageDBC> {
        let key: MessageKey = self.msg_key_by_hex.get(id_hex).copied()?;
        self.get_message_by_key(key)
    }

    /// Returns a `&MessageDBC` given the name (case-insensitive).
    pub fn get_message_by_name(&self, name: &str) -> Option<&MessageDBC> {
        let key: MessageKey = self.get_msg_key_by_name(name)?;
        self.get_message_by_key(key)
    }

    /// Returns a `&mut MessageDBC` given the name (case-insensitive).
    pub fn get_message_by_name_mut(&mut self, name: &str) -> Option<&mut MessageDBC> {
        let key: MessageKey = self.get_msg_key_by_name(name)?;
        self.get_message_by_key_mut(key)
    }

    // -------------- Signals ------------
    /// Attaches a parsed signal to a message. The signal's extraction steps
    /// are compiled here; a duplicate name within the message is an error.
    pub fn add_signal(
        &mut self,
        msg_key: MessageKey,
        mut sig: SignalDBC,
    ) -> Result<(), DatabaseError> {
        let Some(msg) = self.messages.get_mut(msg_key) else {
            return Err(DatabaseError::MessageMissing {
                message_key: msg_key,
            });
        };
        if msg.get_signal(&sig.name).is_some() {
            return Err(DatabaseError::SignalAlreadyExists {
                message: msg.name.clone(),
                signal: sig.name.clone(),
            });
        }
        sig.compile_inline();
        if matches!(sig.mux, MuxRole::Multiplexor) && msg.multiplexor.is_none() {
            msg.multiplexor = Some(sig.name.clone());
        }
        msg.signals.push(sig);
        Ok(())
    }

    /// Returns the signal with the given name within the given message.
    pub fn get_signal(&self, id: u32, name: &str) -> Option<&SignalDBC> {
        self.get_message_by_id(id)?.get_signal(name)
    }

    pub fn get_signal_mut(&mut self, id: u32, name: &str) -> Option<&mut SignalDBC> {
        self.get_message_by_id_mut(id)?.get_signal_mut(name)
    }

    /// Label for a raw signal value: the inline `VAL_` map first, then the
    /// referenced `VAL_TABLE_`, if any.
    pub fn signal_value_description(&self, id: u32, signal: &str, raw: i64) -> Option<&str> {
        let sig: &SignalDBC = self.get_signal(id, signal)?;
        if let Some(label) = sig.value_table.get(&raw) {
            return Some(label.as_str());
        }
        let table: &str = sig.value_table_ref.as_deref()?;
        self.value_tables.get(table)?.describe(raw)
    }

    // -------------- Value tables / environment variables ------------
    pub fn add_value_table(&mut self, table: ValueTableDBC) -> Result<(), DatabaseError> {
        if self.value_tables.contains_key(&table.name) {
            return Err(DatabaseError::ValueTableAlreadyExists { name: table.name });
        }
        self.value_tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn get_value_table(&self, name: &str) -> Option<&ValueTableDBC> {
        self.value_tables.get(name)
    }

    pub fn add_env_var(&mut self, ev: EnvVarDBC) -> Result<(), DatabaseError> {
        if self.env_vars.contains_key(&ev.name) {
            return Err(DatabaseError::EnvVarAlreadyExists { name: ev.name });
        }
        self.env_vars.insert(ev.name.clone(), ev);
        Ok(())
    }

    pub fn get_env_var(&self, name: &str) -> Option<&EnvVarDBC> {
        self.env_vars.get(name)
    }

    pub fn get_env_var_mut(&mut self, name: &str) -> Option<&mut EnvVarDBC> {
        self.env_vars.get_mut(name)
    }

    // -------------- Attributes ------------
    fn attr_spec_map(&mut self, object: AttrObject) -> &mut BTreeMap<String, AttributeSpec> {
        match object {
            AttrObject::Database => &mut self.db_attr_spec,
            AttrObject::Node => &mut self.node_attr_spec,
            AttrObject::Message => &mut self.msg_attr_spec,
            AttrObject::Signal => &mut self.sig_attr_spec,
            AttrObject::EnvVar => &mut self.ev_attr_spec,
        }
    }

    /// Registers a `BA_DEF_` definition in its scope map; duplicates within a
    /// scope are errors.
    pub fn define_attribute(&mut self, def: AttributeDef) -> Result<(), DatabaseError> {
        let scope: &'static str = def.object.as_str();
        let map = self.attr_spec_map(def.object);
        if map.get(&def.name).is_some_and(|s| s.def.is_some()) {
            return Err(DatabaseError::AttributeAlreadyDefined {
                name: def.name.clone(),
                scope,
            });
        }
        let name = def.name.clone();
        map.entry(name).or_default().def = Some(def);
        Ok(())
    }

    /// Stores a `BA_DEF_DEF_` default next to the matching definition,
    /// whichever scope it was declared for.
    pub fn set_attribute_default(
        &mut self,
        name: &str,
        literal: &AttrLiteral,
    ) -> Result<(), DatabaseError> {
        for object in [
            AttrObject::Database,
            AttrObject::Node,
            AttrObject::Message,
            AttrObject::Signal,
            AttrObject::EnvVar,
        ] {
            let map = self.attr_spec_map(object);
            if let Some(spec) = map.get_mut(name)
                && let Some(def) = spec.def.clone()
            {
                let value: AttributeValue = def.coerce(literal)?;
                spec.default = Some(value);
                return Ok(());
            }
        }
        Err(DatabaseError::AttributeNotDefined {
            name: name.to_string(),
        })
    }

    /// Validates and stores a network-scope `BA_` value.
    pub fn set_network_attribute(
        &mut self,
        name: &str,
        literal: &AttrLiteral,
    ) -> Result<(), DatabaseError> {
        let def: AttributeDef = self
            .db_attr_spec
            .get(name)
            .and_then(|s| s.def.clone())
            .ok_or_else(|| DatabaseError::AttributeNotDefined {
                name: name.to_string(),
            })?;
        let value: AttributeValue = def.coerce(literal)?;
        if name == "DBName"
            && let AttributeValue::Str(ref text) = value
        {
            self.name = text.clone();
        }
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// Typed value for a `BA_` assignment against a non-network scope.
    /// The caller stores it on the target entity.
    pub fn coerce_scoped_attribute(
        &self,
        object: AttrObject,
        name: &str,
        literal: &AttrLiteral,
    ) -> Result<AttributeValue, DatabaseError> {
        let map = match object {
            AttrObject::Database => &self.db_attr_spec,
            AttrObject::Node => &self.node_attr_spec,
            AttrObject::Message => &self.msg_attr_spec,
            AttrObject::Signal => &self.sig_attr_spec,
            AttrObject::EnvVar => &self.ev_attr_spec,
        };
        let def: &AttributeDef = map
            .get(name)
            .and_then(|s| s.def.as_ref())
            .ok_or_else(|| DatabaseError::AttributeNotDefined {
                name: name.to_string(),
            })?;
        def.coerce(literal)
    }

    /// Network attribute value, falling back to the `BA_DEF_DEF_` default.
    pub fn network_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .get(name)
            .or_else(|| self.db_attr_spec.get(name)?.default.as_ref())
    }

    /// Node attribute value, falling back to the `BA_DEF_DEF_` default.
    pub fn node_attribute(&self, node: &str, name: &str) -> Option<&AttributeValue> {
        let explicit = self
            .get_node_by_name(node)
            .and_then(|n| n.attributes.get(name));
        explicit.or_else(|| self.node_attr_spec.get(name)?.default.as_ref())
    }

    /// Message attribute value, falling back to the `BA_DEF_DEF_` default.
    pub fn message_attribute(&self, id: u32, name: &str) -> Option<&AttributeValue> {
        let explicit = self
            .get_message_by_id(id)
            .and_then(|m| m.attributes.get(name));
        explicit.or_else(|| self.msg_attr_spec.get(name)?.default.as_ref())
    }

    /// Signal attribute value, falling back to the `BA_DEF_DEF_` default.
    pub fn signal_attribute(&self, id: u32, signal: &str, name: &str) -> Option<&AttributeValue> {
        let explicit = self
            .get_signal(id, signal)
            .and_then(|s| s.attributes.get(name));
        explicit.or_else(|| self.sig_attr_spec.get(name)?.default.as_ref())
    }

    /// Environment-variable attribute value, falling back to the default.
    pub fn env_var_attribute(&self, env: &str, name: &str) -> Option<&AttributeValue> {
        let explicit = self.get_env_var(env).and_then(|e| e.attributes.get(name));
        explicit.or_else(|| self.ev_attr_spec.get(name)?.default.as_ref())
    }

    // -------------- Iteration / ordering ---------------
    /// Iterate nodes following `nodes_order`.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &NodeDBC> + '_ {
        self.nodes_order.iter().filter_map(|&k| self.nodes.get(k))
    }

    /// Iterate messages following `messages_order`.
    pub fn iter_messages(&self) -> impl Iterator<Item = &MessageDBC> + '_ {
        self.messages_order
            .iter()
            .filter_map(|&k| self.messages.get(k))
    }

    /// Sort the node view by name, ASCII case-insensitive.
    pub fn sort_db_nodes_by_name(&mut self) {
        self.nodes_order
            .sort_by_key(|&k| self.nodes.get(k).map(|n| n.name.to_ascii_lowercase()));
    }

    /// Sort the message view by name, ASCII case-insensitive.
    pub fn sort_db_messages_by_name(&mut self) {
        self.messages_order
            .sort_by_key(|&k| self.messages.get(k).map(|m| m.name.to_ascii_lowercase()));
    }

    /// Clear the database.
    pub fn clear(&mut self) {
        *self = DatabaseDBC::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_to_hex() {
        assert_eq!(DatabaseDBC::id_to_hex(0x123), "0x123");
        assert_eq!(DatabaseDBC::id_to_hex(0x18FF_50E5 | CAN_EFF_FLAG), "0x18FF50E5");
    }

    #[test]
    fn test_duplicate_message_id_rejected() {
        let mut db = DatabaseDBC::default();
        db.add_message(100, "EngineData", 8, "ECU1").unwrap();
        assert!(db.add_message(100, "Other", 8, "ECU1").is_err());
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let mut db = DatabaseDBC::default();
        db.add_node("Gateway").unwrap();
        assert!(db.get_node_by_name("gateway").is_some());
        db.add_message(0x10, "BodyStatus", 8, "Gateway").unwrap();
        assert!(db.get_message_by_name("bodystatus").is_some());
        assert!(db.get_message_by_id_hex("0x10").is_some());
    }

    #[test]
    fn test_value_description_falls_back_to_table() {
        let mut db = DatabaseDBC::default();
        db.add_message(7, "M", 8, "E").unwrap();
        let key = db.get_msg_key_by_id(7).unwrap();
        let sig = SignalDBC {
            name: "S".to_string(),
            bit_length: 8,
            value_table_ref: Some("Gears".to_string()),
            ..Default::default()
        };
        db.add_signal(key, sig).unwrap();
        let mut table = ValueTableDBC {
            name: "Gears".to_string(),
            ..Default::default()
        };
        table.entries.insert(1, "First".to_string());
        db.add_value_table(table).unwrap();
        assert_eq!(db.signal_value_description(7, "S", 1), Some("First"));
        assert_eq!(db.signal_value_description(7, "S", 9), None);
    }
}
