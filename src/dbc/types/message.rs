use crate::dbc::types::{attributes::AttributeValue, signal::SignalDBC};
use std::collections::BTreeMap;

/// CAN message defined in the database.
///
/// Maintains the numeric ID (`id`), the normalized hexadecimal ID (`id_hex`),
/// the `name`, payload length (`byte_length`), the transmitting node names,
/// and the owned list of composing signals (unique names, file order).
#[derive(Default, Clone, PartialEq, Debug)]
pub struct MessageDBC {
    /// ID Format (Standard or Extended)
    pub id_format: IdFormat,
    /// Numeric CAN ID (base 10, extended flag kept as part of the integer).
    pub id: u32,
    /// **Normalized** hexadecimal CAN ID (`"0x..."`, uppercase, flag removed).
    pub id_hex: String,
    /// Message name.
    pub name: String,
    /// Payload length in bytes.
    pub byte_length: u16,
    /// Message type (`"CAN"` or `"CAN FD"`, by payload length).
    pub msgtype: String,
    /// Sending node from the `BO_` header.
    pub sender: String,
    /// Additional transmitters from `BO_TX_BU_`, if any.
    pub transmitters: Vec<String>,
    /// Signals that belong to this message, in declaration order.
    pub signals: Vec<SignalDBC>,
    /// Associated comment (DBC `CM_ BO_` section).
    pub comment: String,
    /// Signal groups declared for this message (`SIG_GROUP_`).
    pub signal_groups: Vec<SignalGroupDBC>,
    /// Name of the multiplexer switch signal, when the message is multiplexed.
    pub multiplexor: Option<String>,

    // --- Message Attribute Entry ---
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl MessageDBC {
    /// Returns the signal with the given name (case-insensitive).
    pub fn get_signal(&self, name: &str) -> Option<&SignalDBC> {
        self.signals
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn get_signal_mut(&mut self, name: &str) -> Option<&mut SignalDBC> {
        self.signals
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Returns the multiplexer switch signal, when one is declared.
    pub fn multiplexor_signal(&self) -> Option<&SignalDBC> {
        let name: &str = self.multiplexor.as_deref()?;
        self.get_signal(name)
    }

    /// Resets all fields to their default values.
    pub fn clear(&mut self) {
        *self = MessageDBC::default();
    }
}

#[derive(Default, Copy, Clone, PartialEq, Debug)]
pub enum IdFormat {
    #[default]
    Standard,
    Extended,
}

impl IdFormat {
    pub fn to_str(&self) -> String {
        match self {
            IdFormat::Standard => "Standard".to_string(),
            IdFormat::Extended => "Extended".to_string(),
        }
    }
}

/// What role (if any) a signal plays in multiplexing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MuxRole {
    /// Not multiplexed (always present).
    #[default]
    None,
    /// This signal is the multiplexer switch (marked as `M` in DBC).
    Multiplexor,
    /// This signal is present only when the switch equals the key (`mX`).
    Multiplexed(u32),
}

/// Named group of signals declared by `SIG_GROUP_`.
///
/// Member signals are referenced by name and resolved against the owning
/// message at use time.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct SignalGroupDBC {
    pub message_id: u32,
    pub name: String,
    pub repetitions: u32,
    pub signal_names: Vec<String>,
}
