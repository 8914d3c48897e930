use std::io;
use thiserror::Error;

use crate::dbc::types::database::MessageKey;

/// Errors produced while loading and parsing a `.dbc` file.
///
/// Most malformed statements are recoverable and surface as
/// [`Diagnostic`](crate::dbc::types::diag::Diagnostic)s instead; this enum covers
/// the cases where no usable database can be returned at all.
#[derive(Debug, Error)]
pub enum DbcParseError {
    #[error("Not a valid .dbc file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed VERSION statement at line {line}")]
    MalformedVersion { line: usize },
    #[error("No recognizable DBC declarations in input")]
    NoDeclarations,
}

/// Errors produced while verifying that a signal fits a CAN frame layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageLayoutError {
    #[error("Signal bit length cannot be zero")]
    ZeroBitLength,
    #[error(
        "Out of bounds (Intel): signal end bit = {end}, message total bits = {total_bits} (bytes={byte_length})"
    )]
    IntelOutOfBounds {
        end: usize,
        total_bits: usize,
        byte_length: u16,
    },
    #[error(
        "Out of bounds (Motorola): signal end bit = {end}, message total bits = {total_bits} (bytes={byte_length})"
    )]
    MotorolaOutOfBounds {
        end: usize,
        total_bits: usize,
        byte_length: u16,
    },
}

/// Errors returned by high-level operations on
/// [`DatabaseDBC`](crate::dbc::types::database::DatabaseDBC).
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Node '{name}' already exists")]
    NodeAlreadyExists { name: String },
    #[error("Message ID {id} already assigned to an existing message")]
    MessageIdAlreadyAssigned { id: u32 },
    #[error("Message not found for key {message_key:?}")]
    MessageMissing { message_key: MessageKey },
    #[error("Signal '{signal}' already exists in message '{message}'")]
    SignalAlreadyExists { message: String, signal: String },
    #[error("Value table '{name}' already exists")]
    ValueTableAlreadyExists { name: String },
    #[error("Environment variable '{name}' already exists")]
    EnvVarAlreadyExists { name: String },
    #[error("Attribute '{name}' already defined for scope {scope}")]
    AttributeAlreadyDefined { name: String, scope: &'static str },
    #[error("Attribute '{name}' has no definition")]
    AttributeNotDefined { name: String },
    #[error("Attribute '{name}': value does not match the declared {expected} type")]
    AttributeTypeMismatch { name: String, expected: &'static str },
    #[error("Attribute '{name}': value {value} outside declared bounds")]
    AttributeOutOfBounds { name: String, value: String },
    #[error("Attribute '{name}': enum index {index} out of range (0..{len})")]
    EnumIndexOutOfRange {
        name: String,
        index: i64,
        len: usize,
    },
    #[error("Attribute '{name}': enum label '{label}' not declared")]
    EnumLabelUnknown { name: String, label: String },
    #[error(transparent)]
    Layout(#[from] MessageLayoutError),
}
