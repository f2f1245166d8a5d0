use std::io;

use thiserror::Error;

use crate::types::CompletionCode;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Not enough bytes to hold a fixed header, the declared payload or the trailer.
    #[error("short packet")]
    ShortPacket,

    /// Checksum mismatch, bad declared length or otherwise malformed packet.
    #[error("invalid packet: {0}")]
    InvalidPacket(&'static str),

    /// The session header carries an authentication type other than "none".
    #[error("unsupported session auth type {0:#04x}")]
    UnsupportedAuth(u8),

    /// The UDP socket could not be resolved, bound or connected.
    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    /// No reply arrived before the deadline.
    #[error("timeout waiting for response")]
    Timeout,

    /// The remote side offers none of the authentication types we can use.
    #[error("no supported authentication type offered")]
    NoSupportedAuthType,

    /// An IPMI command completed with a non-zero completion code.
    #[error("ipmi command failed: {0}")]
    CompletionCode(CompletionCode),

    /// I/O error while sending or receiving.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The session has been closed.
    #[error("session is closed")]
    Closed,
}
