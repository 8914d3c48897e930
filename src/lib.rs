//! # dbc_tools
//!
//! Rust utilities for parsing **CAN DBC** databases and decoding raw frames.
//!
//! ## Highlights
//! - **DBC parser**: load CAN databases from `.dbc` text into a SlotMap-backed
//!   [`DatabaseDBC`](crate::dbc::types::database::DatabaseDBC).
//! - **Recoverable parsing**: malformed statements become [`Diagnostic`](crate::dbc::types::diag::Diagnostic)s
//!   with line/column positions; the rest of the file still parses.
//! - **Fast lookups**: normalized helpers (`get_message_by_id/_hex/_name`, `get_node_by_name`,
//!   `get_signal`), iteration following order vectors.
//! - **Frame decoding**: [`Decoder`](crate::decode::Decoder) resolves the active multiplex
//!   branch and emits physical-valued signal readings with units and value-table labels.
//!

pub mod dbc;
pub mod decode;

pub use crate::dbc::parse::{ParseOutput, from_file, from_str};
pub use crate::decode::{DecodedMessage, DecodedSignal, Decoder, DecoderOptions};
