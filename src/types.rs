use core::fmt;

use crate::error::{Error, Result};

/// Network function codes (IPMI v2.0 section 5.1).
///
/// Only the request codes are listed; the matching response code is `request + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NetFn {
    /// Chassis device requests.
    Chassis = 0x00,
    /// Sensor and event requests.
    SensorEvent = 0x04,
    /// Application requests.
    App = 0x06,
    /// Non-volatile storage requests.
    Storage = 0x0A,
    /// Group extension requests.
    GroupExtension = 0x2C,
}

impl NetFn {
    /// Raw 6-bit request code.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Raw code a responder uses for the reply to this network function.
    pub fn response_code(self) -> u8 {
        self.as_u8() + 1
    }
}

impl TryFrom<u8> for NetFn {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Chassis),
            0x04 => Ok(Self::SensorEvent),
            0x06 => Ok(Self::App),
            0x0A => Ok(Self::Storage),
            0x2C => Ok(Self::GroupExtension),
            _ => Err(Error::InvalidPacket("unknown network function")),
        }
    }
}

/// Command numbers (IPMI v2.0 table G-1) known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandCode {
    /// `Get Device ID` (App).
    GetDeviceId = 0x01,
    /// `Get Device SDR Info` (Sensor/Event).
    GetDeviceSdrInfo = 0x20,
    /// `Get Sensor Reading` (Sensor/Event).
    GetSensorReading = 0x2D,
    /// `Get Channel Authentication Capabilities` (App).
    GetChannelAuthCapabilities = 0x38,
    /// `Set Session Privilege Level` (App).
    SetSessionPrivilegeLevel = 0x3B,
    /// `Close Session` (App).
    CloseSession = 0x3C,
}

impl CommandCode {
    /// Raw command byte.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CommandCode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::GetDeviceId),
            0x20 => Ok(Self::GetDeviceSdrInfo),
            0x2D => Ok(Self::GetSensorReading),
            0x38 => Ok(Self::GetChannelAuthCapabilities),
            0x3B => Ok(Self::SetSessionPrivilegeLevel),
            0x3C => Ok(Self::CloseSession),
            _ => Err(Error::InvalidPacket("unknown command code")),
        }
    }
}

/// The privilege level requested for the IPMI session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrivilegeLevel {
    /// No level requested.
    Unspecified = 0x00,
    /// Callback privilege.
    Callback = 0x01,
    /// User privilege.
    User = 0x02,
    /// Operator privilege.
    Operator = 0x03,
    /// Administrator privilege.
    Administrator = 0x04,
    /// OEM-defined privilege.
    Oem = 0x05,
}

impl PrivilegeLevel {
    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }
}

/// IPMI v1.5 session authentication types.
///
/// The discriminant is also the bit index in the auth type support mask of
/// `Get Channel Authentication Capabilities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AuthType {
    /// No authentication.
    None = 0x00,
    /// MD2.
    Md2 = 0x01,
    /// MD5.
    Md5 = 0x02,
    /// Straight password / key.
    Password = 0x04,
    /// OEM proprietary.
    Oem = 0x05,
}

impl AuthType {
    /// Raw auth type byte as carried in the session header.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Mask of this type in the auth type support byte.
    pub fn bit(self) -> u8 {
        1 << self.as_u8()
    }
}

/// IPMI completion code (IPMI v2.0 table 5-2).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompletionCode(pub u8);

impl CompletionCode {
    /// Command completed normally.
    pub const COMPLETED: Self = Self(0x00);
    /// Node busy.
    pub const NODE_BUSY: Self = Self(0xC0);
    /// Invalid command.
    pub const INVALID_COMMAND: Self = Self(0xC1);
    /// Request data length invalid.
    pub const REQUEST_LENGTH_INVALID: Self = Self(0xC7);
    /// Invalid data field in request.
    pub const INVALID_DATA_FIELD: Self = Self(0xCC);
    /// Insufficient privilege level.
    pub const INSUFFICIENT_PRIVILEGE: Self = Self(0xD4);
    /// Unspecified error.
    pub const UNSPECIFIED: Self = Self(0xFF);

    /// Raw completion code byte.
    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Whether the command completed normally.
    pub fn is_success(self) -> bool {
        self == Self::COMPLETED
    }

    /// Human-readable reason for the generic codes, `None` for anything else.
    pub fn description(self) -> Option<&'static str> {
        let s = match self.0 {
            0x00 => "Command completed normally",
            0xC0 => "Node busy",
            0xC1 => "Invalid command",
            0xC2 => "Command invalid for given LUN",
            0xC3 => "Timeout while processing command",
            0xC4 => "Out of space",
            0xC5 => "Reservation canceled or invalid reservation ID",
            0xC6 => "Request data truncated",
            0xC7 => "Request data length invalid",
            0xC8 => "Request data field length limit exceeded",
            0xC9 => "Parameter out of range",
            0xCA => "Cannot return number of requested data bytes",
            0xCB => "Requested sensor, data, or record not present",
            0xCC => "Invalid data field in request",
            0xCD => "Command illegal for specified sensor or record type",
            0xCE => "Command response could not be provided",
            0xCF => "Cannot execute duplicated request",
            0xD0 => "SDR repository in update mode",
            0xD1 => "Device in firmware update mode",
            0xD2 => "BMC initialization in progress",
            0xD3 => "Destination unavailable",
            0xD4 => "Insufficient privilege level",
            0xD5 => "Command not supported in present state",
            0xD6 => "Command sub-function disabled or unavailable",
            0xFF => "Unspecified error",
            _ => return None,
        };
        Some(s)
    }
}

impl From<u8> for CompletionCode {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for CompletionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(s) => f.write_str(s),
            None => write!(f, "completion code {:#04x}", self.0),
        }
    }
}

impl fmt::Debug for CompletionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompletionCode({:#04x})", self.0)
    }
}

/// Request payload for `Get Channel Authentication Capabilities` (section 22.13).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCapabilitiesRequest {
    /// Channel number in the low nibble, bit 7 requests IPMI v2.0 extended data.
    pub channel_selector: u8,
    /// Requested maximum privilege level.
    pub privilege: PrivilegeLevel,
}

impl AuthCapabilitiesRequest {
    /// Serialize in wire order.
    pub fn to_bytes(&self) -> [u8; 2] {
        [self.channel_selector, self.privilege.as_u8()]
    }
}

/// Response payload for `Get Channel Authentication Capabilities` (section 22.13).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCapabilitiesResponse {
    /// Completion code.
    pub completion_code: CompletionCode,
    /// Channel number the answer applies to.
    pub channel_number: u8,
    /// Auth type support mask; bit *i* set means [`AuthType`] *i* is offered.
    pub auth_type_support: u8,
    /// Login status flags.
    pub status: u8,
    /// Reserved byte (extended capabilities on v2.0 channels).
    pub reserved: u8,
    /// OEM identifier.
    pub oem_id: u16,
    /// OEM auxiliary data.
    pub oem_aux: u8,
}

impl AuthCapabilitiesResponse {
    /// Size of the response payload including the completion code.
    pub const LEN: usize = 8;

    /// Whether the remote side offers `auth`.
    pub fn supports(&self, auth: AuthType) -> bool {
        self.auth_type_support & auth.bit() != 0
    }

    /// IPMI v2.0 extended data is present.
    pub fn v20_data_available(&self) -> bool {
        self.auth_type_support & 0x80 != 0
    }

    /// Per-message authentication is disabled.
    pub fn per_message_auth_disabled(&self) -> bool {
        self.status & 0x10 != 0
    }

    /// User-level authentication is disabled.
    pub fn user_level_auth_disabled(&self) -> bool {
        self.status & 0x08 != 0
    }

    /// One or more non-null user names exist.
    pub fn non_null_usernames(&self) -> bool {
        self.status & 0x04 != 0
    }

    /// One or more null user names with non-null passwords exist.
    pub fn null_usernames(&self) -> bool {
        self.status & 0x02 != 0
    }

    /// Anonymous login (null user, null password) is enabled.
    pub fn anonymous_login_enabled(&self) -> bool {
        self.status & 0x01 != 0
    }
}
