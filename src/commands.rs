//! Typed IPMI commands.

use crate::error::{Error, Result};
use crate::message::Request;
use crate::types::{
    AuthCapabilitiesRequest, AuthCapabilitiesResponse, CommandCode, CompletionCode, NetFn,
    PrivilegeLevel,
};

/// Channel number meaning "the channel this request arrived on".
pub const CURRENT_CHANNEL: u8 = 0x0E;

/// Channel selector bit asking for IPMI v2.0 extended data.
pub const V2_EXTENDED_DATA: u8 = 0x80;

/// A typed IPMI command (single request/response).
pub trait Command {
    /// Parsed output type.
    type Output;

    /// Network Function (NetFn) for the request.
    const NETFN: NetFn;

    /// Command number.
    const CMD: CommandCode;

    /// Encode request payload bytes (excluding NetFn/Cmd framing).
    fn request_data(&self) -> Vec<u8>;

    /// Parse a response payload, completion code first, into the typed output.
    fn parse_response(&self, payload: &[u8]) -> Result<Self::Output>;

    /// Logical request carrying this command.
    fn to_request(&self) -> Request {
        Request::new(Self::NETFN, Self::CMD, self.request_data())
    }
}

fn completion_code(payload: &[u8]) -> Result<CompletionCode> {
    let code = CompletionCode(*payload.first().ok_or(Error::ShortPacket)?);
    if !code.is_success() {
        return Err(Error::CompletionCode(code));
    }
    Ok(code)
}

/// `Get Channel Authentication Capabilities` (App NetFn, cmd 0x38).
#[derive(Debug, Clone, Copy)]
pub struct GetChannelAuthCapabilities {
    /// Channel number (low nibble).
    pub channel: u8,
    /// Privilege to query.
    pub privilege: PrivilegeLevel,
    /// Request that IPMI v2.0 data be included when available.
    pub request_v2_data: bool,
}

impl GetChannelAuthCapabilities {
    /// Create a query that requests IPMI v2.0 data (when supported).
    pub fn new(channel: u8, privilege: PrivilegeLevel) -> Self {
        Self {
            channel,
            privilege,
            request_v2_data: true,
        }
    }

    /// Query the current channel with IPMI v2.0 data, selector `0x8e`.
    pub fn current_channel(privilege: PrivilegeLevel) -> Self {
        Self::new(CURRENT_CHANNEL, privilege)
    }

    /// Return a variant that does not request IPMI v2.0 data.
    pub fn without_v2_data(self) -> Self {
        Self {
            request_v2_data: false,
            ..self
        }
    }

    /// The request payload as a typed value.
    pub fn payload(&self) -> AuthCapabilitiesRequest {
        let channel = self.channel & 0x0F;
        let channel_selector = if self.request_v2_data {
            channel | V2_EXTENDED_DATA
        } else {
            channel
        };
        AuthCapabilitiesRequest {
            channel_selector,
            privilege: self.privilege,
        }
    }
}

impl Command for GetChannelAuthCapabilities {
    type Output = AuthCapabilitiesResponse;
    const NETFN: NetFn = NetFn::App;
    const CMD: CommandCode = CommandCode::GetChannelAuthCapabilities;

    fn request_data(&self) -> Vec<u8> {
        self.payload().to_bytes().to_vec()
    }

    fn parse_response(&self, payload: &[u8]) -> Result<Self::Output> {
        parse_auth_capabilities(payload)
    }
}

pub(crate) fn parse_auth_capabilities(payload: &[u8]) -> Result<AuthCapabilitiesResponse> {
    let completion_code = completion_code(payload)?;

    let data: &[u8; AuthCapabilitiesResponse::LEN] = payload
        .get(..AuthCapabilitiesResponse::LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::ShortPacket)?;

    Ok(AuthCapabilitiesResponse {
        completion_code,
        channel_number: data[1],
        auth_type_support: data[2],
        status: data[3],
        reserved: data[4],
        oem_id: u16::from_le_bytes([data[5], data[6]]),
        oem_aux: data[7],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_channel_selector_is_0x8e() {
        let cmd = GetChannelAuthCapabilities::current_channel(PrivilegeLevel::Administrator);
        assert_eq!(cmd.request_data(), vec![0x8E, 0x04]);

        let request = cmd.to_request();
        assert_eq!(request.netfn, NetFn::App);
        assert_eq!(request.command, CommandCode::GetChannelAuthCapabilities);
        assert_eq!(request.data, vec![0x8E, 0x04]);
    }

    #[test]
    fn parse_auth_capabilities_fields() {
        let payload = [0x00, 0x01, 0x95, 0x04, 0x00, 0x34, 0x12, 0x77];
        let caps = parse_auth_capabilities(&payload).expect("parse");

        assert!(caps.completion_code.is_success());
        assert_eq!(caps.channel_number, 0x01);
        assert_eq!(caps.auth_type_support, 0x95);
        assert_eq!(caps.status, 0x04);
        assert_eq!(caps.reserved, 0x00);
        assert_eq!(caps.oem_id, 0x1234);
        assert_eq!(caps.oem_aux, 0x77);
    }

    #[test]
    fn parse_auth_capabilities_short_payload() {
        let err = parse_auth_capabilities(&[0x00, 0x01, 0x95]).unwrap_err();
        assert!(matches!(err, Error::ShortPacket));

        let err = parse_auth_capabilities(&[]).unwrap_err();
        assert!(matches!(err, Error::ShortPacket));
    }

    #[test]
    fn parse_auth_capabilities_reports_completion_code() {
        let err = parse_auth_capabilities(&[0xCC]).unwrap_err();
        assert!(matches!(
            err,
            Error::CompletionCode(CompletionCode::INVALID_DATA_FIELD)
        ));
        assert_eq!(err.to_string(), "ipmi command failed: Invalid data field in request");
    }
}
