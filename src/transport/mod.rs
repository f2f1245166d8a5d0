use crate::error::Result;

/// A synchronous transport for exchanging RMCP/IPMI datagrams.
///
/// One request is outstanding at a time; the reply is the next datagram the
/// transport receives.
pub trait Transport {
    /// Send a request datagram and wait for the next response datagram.
    ///
    /// Implementations return [`crate::Error::Timeout`] when no datagram arrives
    /// before their deadline and never retransmit on their own.
    fn send_recv(&self, request: &[u8]) -> Result<Vec<u8>>;
}

pub(crate) mod blocking;

pub use blocking::UdpTransport;
