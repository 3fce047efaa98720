//! Error types for the protocol layer.
//!
//! Each crate defines its own error enum, so a `ProtocolError` always
//! means the problem is in serialization/deserialization, not in
//! networking or room management.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed. Common causes: malformed JSON, missing
    /// required fields, wrong data types, or truncated frames.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message is invalid at the protocol level even though it
    /// deserialized cleanly.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
