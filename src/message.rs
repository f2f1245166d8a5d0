//! Assembly and validation of whole IPMI LAN datagrams.

use crate::codec::{
    AUTH_TYPE_NONE, FIXED_HEADERS_LEN, MESSAGE_HEADER_LEN, MessageHeader, RMCP_CLASS_IPMI,
    RMCP_HEADER_LEN, RmcpHeader, SESSION_HEADER_LEN, SessionHeader, netfn_lun,
};
use crate::error::{Error, Result};
use crate::types::{CommandCode, NetFn};

/// Message length written into outbound requests.
///
/// This is the fixed value for `Get Channel Authentication Capabilities`
/// (message header plus its two payload bytes as counted by the parser). It is
/// not derived from the payload size, so a request with a different payload
/// length will not round-trip through [`parse`].
pub const REQUEST_MESSAGE_LEN: u8 = 0x09;

/// A logical outbound IPMI request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Network function.
    pub netfn: NetFn,
    /// Command number.
    pub command: CommandCode,
    /// Responder LUN.
    pub lun: u8,
    /// Serialized request payload, in declared field order.
    pub data: Vec<u8>,
}

impl Request {
    /// Request addressed to LUN 0.
    pub fn new(netfn: NetFn, command: CommandCode, data: impl Into<Vec<u8>>) -> Self {
        Self {
            netfn,
            command,
            lun: 0,
            data: data.into(),
        }
    }

    /// Address the request to another LUN (low two bits only).
    pub fn with_lun(mut self, lun: u8) -> Self {
        self.lun = lun & 0x03;
        self
    }
}

/// A decoded datagram: the three headers plus the payload between the message
/// header and the trailing checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// RMCP envelope.
    pub rmcp: RmcpHeader,
    /// IPMI session header.
    pub session: SessionHeader,
    /// IPMI message header.
    pub header: MessageHeader,
    /// Payload bytes, excluding the trailing checksum.
    pub payload: Vec<u8>,
}

impl Message {
    /// Assemble the request message for `request` in the given session state.
    pub fn request(request: &Request, sequence: u32, session_id: u32) -> Self {
        Self {
            rmcp: RmcpHeader::ipmi(),
            session: SessionHeader::unauthenticated(sequence, session_id),
            header: MessageHeader::for_request(
                REQUEST_MESSAGE_LEN,
                request.netfn.as_u8(),
                request.lun,
                request.command.as_u8(),
            ),
            payload: request.data.clone(),
        }
    }

    /// Build the reply a responder would send to this request.
    ///
    /// Addresses are swapped, the network function becomes the response code
    /// and the message length covers the header plus `payload`.
    pub fn reply(&self, payload: Vec<u8>) -> Result<Self> {
        let message_len = u8::try_from(MESSAGE_HEADER_LEN + payload.len())
            .map_err(|_| Error::InvalidPacket("payload too large"))?;

        let mut header = MessageHeader {
            message_len,
            rs_addr: self.header.rq_addr,
            netfn_lun: netfn_lun(self.header.netfn() + 1, self.header.lun()),
            checksum: 0,
            rq_addr: self.header.rs_addr,
            rq_seq: self.header.rq_seq,
            command: self.header.command,
        };
        header.checksum = header.expected_checksum();

        Ok(Self {
            rmcp: self.rmcp,
            session: self.session,
            header,
            payload,
        })
    }

    /// Completion code of a response payload, when present.
    pub fn completion_code(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Serialize headers, payload and a freshly computed payload checksum.
    ///
    /// The header fields, including the message length and header checksum,
    /// are written exactly as stored.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FIXED_HEADERS_LEN + self.payload.len() + 1);
        self.rmcp.encode_into(&mut out);
        self.session.encode_into(&mut out);
        self.header.encode_into(&mut out);
        out.extend_from_slice(&self.payload);
        out.push(self.expected_payload_checksum());
        out
    }

    /// Checksum over requester address, requester sequence, command and payload.
    pub fn expected_payload_checksum(&self) -> u8 {
        let mut c = self.header.payload_checksum();
        c.update(&self.payload);
        c.finish()
    }
}

/// Build the wire bytes for `request`.
pub fn build(request: &Request, sequence: u32, session_id: u32) -> Vec<u8> {
    Message::request(request, sequence, session_id).to_bytes()
}

/// Parse and validate an inbound datagram.
///
/// Checks run in wire order: fixed header length, RMCP class, session auth
/// type, header checksum, declared message length, payload presence, payload
/// checksum. Bytes after the payload checksum are ignored.
pub fn parse(bytes: &[u8]) -> Result<Message> {
    if bytes.len() < FIXED_HEADERS_LEN {
        return Err(Error::ShortPacket);
    }

    let rmcp = RmcpHeader::decode(bytes)?;
    if rmcp.class != RMCP_CLASS_IPMI {
        return Err(Error::InvalidPacket("unsupported RMCP class"));
    }

    let session = SessionHeader::decode(&bytes[RMCP_HEADER_LEN..])?;
    if session.auth_type != AUTH_TYPE_NONE {
        return Err(Error::UnsupportedAuth(session.auth_type));
    }

    let header = MessageHeader::decode(&bytes[RMCP_HEADER_LEN + SESSION_HEADER_LEN..])?;
    if header.checksum != header.expected_checksum() {
        return Err(Error::InvalidPacket("header checksum mismatch"));
    }

    if header.message_len == 0 {
        return Err(Error::InvalidPacket("zero message length"));
    }
    let payload_len = usize::from(header.message_len)
        .checked_sub(MESSAGE_HEADER_LEN)
        .ok_or(Error::InvalidPacket("message length shorter than header"))?;

    let rest = &bytes[FIXED_HEADERS_LEN..];
    let payload = rest.get(..payload_len).ok_or(Error::ShortPacket)?;
    let provided = *rest.get(payload_len).ok_or(Error::ShortPacket)?;

    let message = Message {
        rmcp,
        session,
        header,
        payload: payload.to_vec(),
    };

    if provided != message.expected_payload_checksum() {
        return Err(Error::InvalidPacket("payload checksum mismatch"));
    }

    Ok(message)
}
