//! Authentication type negotiation via `Get Channel Authentication Capabilities`.

use crate::commands::GetChannelAuthCapabilities;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{AuthCapabilitiesResponse, AuthType, PrivilegeLevel};

/// Auth types we accept, most preferred first.
pub const PREFERRED_AUTH_TYPES: [AuthType; 3] = [AuthType::Md5, AuthType::Password, AuthType::None];

/// Pick the preferred auth type offered in an auth type support mask.
pub fn select_auth_type(auth_type_support: u8) -> Result<AuthType> {
    PREFERRED_AUTH_TYPES
        .into_iter()
        .find(|t| auth_type_support & t.bit() != 0)
        .ok_or(Error::NoSupportedAuthType)
}

/// Where a session stands in authentication negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Negotiation {
    /// Nothing has been asked of the remote side yet.
    #[default]
    Unauthenticated,
    /// The remote side answered and an auth type was chosen.
    CapabilitiesKnown {
        /// The capabilities reply.
        capabilities: AuthCapabilitiesResponse,
        /// The chosen auth type.
        auth_type: AuthType,
    },
}

impl Negotiation {
    /// Start in [`Negotiation::Unauthenticated`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Query the current channel at `privilege` and choose an auth type.
    ///
    /// Takes exactly one round trip. Once capabilities are known the stored
    /// choice is returned without touching the session. On failure the state
    /// stays [`Negotiation::Unauthenticated`].
    pub fn run(&mut self, session: &mut Session, privilege: PrivilegeLevel) -> Result<AuthType> {
        if let Self::CapabilitiesKnown { auth_type, .. } = self {
            return Ok(*auth_type);
        }

        let capabilities =
            session.execute(GetChannelAuthCapabilities::current_channel(privilege))?;
        let auth_type = select_auth_type(capabilities.auth_type_support)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            channel = capabilities.channel_number,
            auth_type_support = capabilities.auth_type_support,
            ?auth_type,
            "negotiated ipmi auth type"
        );

        *self = Self::CapabilitiesKnown {
            capabilities,
            auth_type,
        };
        Ok(auth_type)
    }

    /// The chosen auth type, once known.
    pub fn auth_type(&self) -> Option<AuthType> {
        match self {
            Self::Unauthenticated => None,
            Self::CapabilitiesKnown { auth_type, .. } => Some(*auth_type),
        }
    }

    /// The capabilities reply, once known.
    pub fn capabilities(&self) -> Option<&AuthCapabilitiesResponse> {
        match self {
            Self::Unauthenticated => None,
            Self::CapabilitiesKnown { capabilities, .. } => Some(capabilities),
        }
    }
}

impl Session {
    /// Run a fresh [`Negotiation`] on this session and return the chosen auth type.
    pub fn negotiate_auth(&mut self, privilege: PrivilegeLevel) -> Result<AuthType> {
        Negotiation::new().run(self, privilege)
    }
}
