//! Fixed-layout encoding of the RMCP, IPMI session and IPMI message headers.
//!
//! All multi-byte fields are little-endian and no padding sits between fields.

use crate::error::{Error, Result};

/// RMCP version 1.0.
pub const RMCP_VERSION: u8 = 0x06;
/// RMCP reserved byte.
pub const RMCP_RESERVED: u8 = 0x00;
/// RMCP sequence number meaning "no ACK requested".
pub const RMCP_SEQ_NO_ACK: u8 = 0xFF;
/// RMCP message class for IPMI.
pub const RMCP_CLASS_IPMI: u8 = 0x07;

/// Session auth type "none", the only one framed by this crate.
pub const AUTH_TYPE_NONE: u8 = 0x00;

/// BMC slave address.
pub const BMC_SLAVE_ADDR: u8 = 0x20;
/// Remote console software ID.
pub const REMOTE_SWID: u8 = 0x81;

/// Encoded size of [`RmcpHeader`].
pub const RMCP_HEADER_LEN: usize = 4;
/// Encoded size of [`SessionHeader`].
pub const SESSION_HEADER_LEN: usize = 1 + 4 + 4;
/// Encoded size of [`MessageHeader`].
pub const MESSAGE_HEADER_LEN: usize = 7;

/// Combined size of the three fixed headers.
pub const FIXED_HEADERS_LEN: usize = RMCP_HEADER_LEN + SESSION_HEADER_LEN + MESSAGE_HEADER_LEN;

/// Compute the 2's complement checksum used by IPMI LAN messages.
///
/// `checksum(data)` added to the byte sum of `data` is zero modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    let mut c = Checksum::new();
    c.update(bytes);
    c.finish()
}

/// Running 2's complement checksum over several fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checksum {
    sum: u8,
}

impl Checksum {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bytes` to the running sum.
    pub fn update(&mut self, bytes: &[u8]) {
        self.sum = bytes.iter().fold(self.sum, |acc, &b| acc.wrapping_add(b));
    }

    /// Negated sum of everything added so far.
    pub fn finish(&self) -> u8 {
        self.sum.wrapping_neg()
    }
}

/// Pack a network function and LUN into one byte.
pub fn netfn_lun(netfn: u8, lun: u8) -> u8 {
    (netfn << 2) | (lun & 0x03)
}

fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::ShortPacket)
}

/// The outer RMCP envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RmcpHeader {
    /// Protocol version, [`RMCP_VERSION`].
    pub version: u8,
    /// Reserved, zero.
    pub reserved: u8,
    /// RMCP sequence number.
    pub sequence: u8,
    /// Message class, [`RMCP_CLASS_IPMI`] for IPMI traffic.
    pub class: u8,
}

impl RmcpHeader {
    /// Header for an IPMI message that does not request an RMCP ACK.
    pub fn ipmi() -> Self {
        Self {
            version: RMCP_VERSION,
            reserved: RMCP_RESERVED,
            sequence: RMCP_SEQ_NO_ACK,
            class: RMCP_CLASS_IPMI,
        }
    }

    /// Serialize to the fixed wire layout.
    pub fn encode(&self) -> [u8; RMCP_HEADER_LEN] {
        [self.version, self.reserved, self.sequence, self.class]
    }

    /// Append the wire layout to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.encode());
    }

    /// Read from the front of `bytes`, failing with [`Error::ShortPacket`] when too few.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let [version, reserved, sequence, class] = take::<RMCP_HEADER_LEN>(bytes)?;
        Ok(Self {
            version,
            reserved,
            sequence,
            class,
        })
    }
}

/// IPMI v1.5 session header without an auth code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHeader {
    /// Authentication type.
    pub auth_type: u8,
    /// Session sequence number.
    pub sequence: u32,
    /// Session ID, zero outside a session.
    pub session_id: u32,
}

impl SessionHeader {
    /// Header with auth type "none".
    pub fn unauthenticated(sequence: u32, session_id: u32) -> Self {
        Self {
            auth_type: AUTH_TYPE_NONE,
            sequence,
            session_id,
        }
    }

    /// Serialize to the fixed wire layout.
    pub fn encode(&self) -> [u8; SESSION_HEADER_LEN] {
        let mut out = [0u8; SESSION_HEADER_LEN];
        out[0] = self.auth_type;
        out[1..5].copy_from_slice(&self.sequence.to_le_bytes());
        out[5..9].copy_from_slice(&self.session_id.to_le_bytes());
        out
    }

    /// Append the wire layout to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.encode());
    }

    /// Read from the front of `bytes`, failing with [`Error::ShortPacket`] when too few.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let raw = take::<SESSION_HEADER_LEN>(bytes)?;
        Ok(Self {
            auth_type: raw[0],
            sequence: u32::from_le_bytes([raw[1], raw[2], raw[3], raw[4]]),
            session_id: u32::from_le_bytes([raw[5], raw[6], raw[7], raw[8]]),
        })
    }
}

/// IPMI LAN message header, from the length byte through the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Message length byte.
    pub message_len: u8,
    /// Responder slave address.
    pub rs_addr: u8,
    /// Network function and responder LUN.
    pub netfn_lun: u8,
    /// Checksum over `rs_addr` and `netfn_lun`.
    pub checksum: u8,
    /// Requester address.
    pub rq_addr: u8,
    /// Requester sequence number and LUN.
    pub rq_seq: u8,
    /// Command number.
    pub command: u8,
}

impl MessageHeader {
    /// Header for a BMC-bound request with a freshly computed header checksum.
    pub fn for_request(message_len: u8, netfn: u8, lun: u8, command: u8) -> Self {
        let mut header = Self {
            message_len,
            rs_addr: BMC_SLAVE_ADDR,
            netfn_lun: netfn_lun(netfn, lun),
            checksum: 0,
            rq_addr: REMOTE_SWID,
            rq_seq: 0,
            command,
        };
        header.checksum = header.expected_checksum();
        header
    }

    /// Checksum over the responder address and netFn/LUN byte.
    pub fn expected_checksum(&self) -> u8 {
        checksum(&[self.rs_addr, self.netfn_lun])
    }

    /// Start of the payload checksum: requester address, sequence and command.
    pub fn payload_checksum(&self) -> Checksum {
        let mut c = Checksum::new();
        c.update(&[self.rq_addr, self.rq_seq, self.command]);
        c
    }

    /// Network function part of `netfn_lun`.
    pub fn netfn(&self) -> u8 {
        self.netfn_lun >> 2
    }

    /// LUN part of `netfn_lun`.
    pub fn lun(&self) -> u8 {
        self.netfn_lun & 0x03
    }

    /// Serialize to the fixed wire layout.
    pub fn encode(&self) -> [u8; MESSAGE_HEADER_LEN] {
        [
            self.message_len,
            self.rs_addr,
            self.netfn_lun,
            self.checksum,
            self.rq_addr,
            self.rq_seq,
            self.command,
        ]
    }

    /// Append the wire layout to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.encode());
    }

    /// Read from the front of `bytes`, failing with [`Error::ShortPacket`] when too few.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let [message_len, rs_addr, netfn_lun, checksum, rq_addr, rq_seq, command] =
            take::<MESSAGE_HEADER_LEN>(bytes)?;
        Ok(Self {
            message_len,
            rs_addr,
            netfn_lun,
            checksum,
            rq_addr,
            rq_seq,
            command,
        })
    }
}
