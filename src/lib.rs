#![deny(unsafe_code)]
#![warn(missing_docs)]

//! A blocking IPMI v1.5 LAN client engine.
//!
//! The crate implements:
//! - RMCP, IPMI session and IPMI message header encoding
//! - 2's complement header and payload checksums
//! - A synchronous, deadline-bounded request/response session over UDP
//! - Authentication type negotiation with `Get Channel Authentication Capabilities`
//!
//! Only unauthenticated (auth type "none") framing is supported.

pub mod codec;
pub mod commands;
mod debug;
mod error;
pub mod message;
mod negotiate;
mod observe;
mod session;
mod transport;
mod types;

pub use crate::commands::{Command, GetChannelAuthCapabilities};
pub use crate::error::{Error, Result};
pub use crate::message::{Message, Request};
pub use crate::negotiate::{Negotiation, PREFERRED_AUTH_TYPES, select_auth_type};
pub use crate::session::{DEFAULT_PORT, DEFAULT_TIMEOUT, Session, SessionBuilder};
pub use crate::transport::{Transport, UdpTransport};
pub use crate::types::{
    AuthCapabilitiesRequest, AuthCapabilitiesResponse, AuthType, CommandCode, CompletionCode,
    NetFn, PrivilegeLevel,
};
