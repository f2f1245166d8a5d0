use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::commands::Command;
use crate::error::{Error, Result};
use crate::message::{self, Message, Request};
use crate::transport::{Transport, UdpTransport};

/// Deadline applied to socket setup and to every reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// IANA-assigned RMCP port.
pub const DEFAULT_PORT: u16 = 623;

/// Builder for [`Session`].
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    host: String,
    timeout: Duration,
    lun: u8,
}

impl SessionBuilder {
    /// Create a builder for `host`, given as `<address>:<port>`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: DEFAULT_TIMEOUT,
            lun: 0,
        }
    }

    /// Set the deadline for each reply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the responder LUN used by [`Session::execute`].
    pub fn lun(mut self, lun: u8) -> Self {
        self.lun = lun & 0x03;
        self
    }

    /// Resolve the host and connect the UDP socket.
    pub fn open(self) -> Result<Session> {
        let target = resolve(&self.host)?;
        let transport = UdpTransport::connect(target, self.timeout)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            host = %self.host,
            %target,
            timeout_ms = self.timeout.as_millis() as u64,
            "ipmi session opened"
        );

        let mut session = Session::with_transport(transport);
        session.lun = self.lun;
        Ok(session)
    }
}

/// Prefer an IPv4 address, as BMCs rarely listen on IPv6.
fn resolve(host: &str) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = host.to_socket_addrs().map_err(Error::Connect)?.collect();

    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            Error::Connect(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "host resolved to no addresses",
            ))
        })
}

/// A LAN connection to one BMC.
///
/// Exactly one request is outstanding at a time; every mutating operation takes
/// `&mut self`, so sharing a session needs external serialization.
pub struct Session {
    transport: Option<Box<dyn Transport + Send>>,
    next_seq: u32,
    session_id: u32,
    lun: u8,
}

impl Session {
    /// Connect to `host` (`<address>:<port>`) with the default 2 second deadline.
    pub fn open(host: &str) -> Result<Self> {
        SessionBuilder::new(host).open()
    }

    /// Create a [`SessionBuilder`].
    pub fn builder(host: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(host)
    }

    /// Run the session over an already connected transport.
    pub fn with_transport(transport: impl Transport + Send + 'static) -> Self {
        Self {
            transport: Some(Box::new(transport)),
            next_seq: 0,
            session_id: 0,
            lun: 0,
        }
    }

    /// Release the transport. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(session_id = self.session_id, "ipmi session closed");
        }
    }

    /// Whether [`Session::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Session ID carried in outbound headers; zero until a session is activated.
    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Allocate the session sequence number for the next request.
    ///
    /// The first call returns 0 (no session established yet); every later call
    /// returns one more than the previous, wrapping at `u32::MAX`.
    pub fn next_sequence(&mut self) -> u32 {
        let current = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        current
    }

    /// Send `request` and wait for the validated reply.
    ///
    /// There is no retransmission: a reply that does not arrive before the
    /// deadline fails with [`Error::Timeout`].
    pub fn call(&mut self, request: &Request) -> Result<Message> {
        if self.is_closed() {
            return Err(Error::Closed);
        }

        let netfn = request.netfn.as_u8();
        let cmd = request.command.as_u8();
        let sequence = self.next_sequence();

        let start = Instant::now();
        let result = self.exchange(request, sequence);
        let elapsed = start.elapsed();
        match &result {
            Ok(reply) => crate::observe::record_ok(
                netfn,
                cmd,
                sequence,
                elapsed,
                reply.completion_code().unwrap_or(0x00),
            ),
            Err(err) => crate::observe::record_err(netfn, cmd, sequence, elapsed, err),
        }
        result
    }

    /// Execute a typed command (single request/response).
    pub fn execute<C: Command>(&mut self, command: C) -> Result<C::Output> {
        let reply = self.call(&command.to_request().with_lun(self.lun))?;
        command.parse_response(&reply.payload)
    }

    fn exchange(&self, request: &Request, sequence: u32) -> Result<Message> {
        let transport = self.transport.as_ref().ok_or(Error::Closed)?;

        let packet = message::build(request, sequence, self.session_id);
        crate::debug::dump_hex("ipmi request", &packet);

        let response_bytes = transport.send_recv(&packet)?;
        crate::debug::dump_hex("ipmi response", &response_bytes);

        let reply = message::parse(&response_bytes)?;
        if reply.header.command != request.command.as_u8() {
            return Err(Error::InvalidPacket("reply is for a different command"));
        }
        Ok(reply)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
