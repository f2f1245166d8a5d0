use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::Transport;

/// Largest datagram we accept. IPMI LAN replies are far smaller.
const MAX_PACKET_SIZE: usize = 1024;

/// Blocking UDP transport bound to a single remote BMC.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral socket, connect it to `target` and apply `timeout`
    /// to both halves of the socket.
    ///
    /// Every failure here is reported as [`Error::Connect`].
    pub fn connect(target: SocketAddr, timeout: Duration) -> Result<Self> {
        let bind_addr = match target {
            SocketAddr::V4(_) => "0.0.0.0:0",
            SocketAddr::V6(_) => "[::]:0",
        };

        let socket = UdpSocket::bind(bind_addr).map_err(Error::Connect)?;
        socket.connect(target).map_err(Error::Connect)?;
        socket
            .set_read_timeout(Some(timeout))
            .map_err(Error::Connect)?;
        socket
            .set_write_timeout(Some(timeout))
            .map_err(Error::Connect)?;

        Ok(Self {
            socket,
            peer: target,
        })
    }

    /// Remote address this transport talks to.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for UdpTransport {
    fn send_recv(&self, request: &[u8]) -> Result<Vec<u8>> {
        self.socket.send(request).map_err(map_io)?;

        let mut buf = vec![0u8; MAX_PACKET_SIZE];
        let n = self.socket.recv(&mut buf).map_err(map_io)?;
        buf.truncate(n);
        Ok(buf)
    }
}

fn map_io(e: io::Error) -> Error {
    if is_timeout(&e) {
        Error::Timeout
    } else {
        Error::Io(e)
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
