//! Standard library UDP socket adapter for the [`ntp_wire`] packet codec.
//!
//! This crate provides a thin wrapper around [`std::net::UdpSocket`] that sends and
//! receives whole [`Packet`]s. Socket options such as read timeouts are left to the
//! caller and set on the socket before wrapping it.
//!
//! # Example
//!
//! ```no_run
//! use ntp_wire::{clock::Measurement, to_ntp_time, Packet};
//! use ntp_wire_net_std::UdpSocketWrapper;
//! use std::net::{ToSocketAddrs, UdpSocket};
//! use std::time::{Duration, SystemTime};
//!
//! let socket = UdpSocket::bind("0.0.0.0:0").expect("Unable to create UDP socket");
//! socket
//!     .set_read_timeout(Some(Duration::from_secs(2)))
//!     .expect("Unable to set read timeout");
//! let socket = UdpSocketWrapper::new(socket);
//! let server = "pool.ntp.org:123"
//!     .to_socket_addrs()
//!     .expect("Unable to resolve server")
//!     .next()
//!     .expect("No server address");
//!
//! let request = Packet::client_request(to_ntp_time(SystemTime::now()));
//! socket.send_packet(&request, server).expect("Unable to send request");
//! let (response, _) = socket.recv_packet().expect("No response");
//! let measurement = Measurement::from_response(&response, SystemTime::now());
//!
//! println!("offset {} ns, delay {} ns", measurement.offset, measurement.delay);
//! ```

use ntp_wire::{Error, PACKET_SIZE, Packet, Result};

use std::net::{SocketAddr, UdpSocket};

/// A wrapper around [`std::net::UdpSocket`] exchanging NTP packets.
///
/// All I/O is blocking and failures are reported as [`Error::Network`].
///
/// # Example
///
/// ```no_run
/// use ntp_wire_net_std::UdpSocketWrapper;
/// use std::net::UdpSocket;
///
/// let socket = UdpSocket::bind("0.0.0.0:0").expect("Failed to bind socket");
/// let wrapper = UdpSocketWrapper::new(socket);
/// ```
#[derive(Debug)]
pub struct UdpSocketWrapper {
    socket: UdpSocket,
}

impl UdpSocketWrapper {
    /// Creates a new `UdpSocketWrapper` from a [`std::net::UdpSocket`].
    #[must_use]
    pub fn new(socket: UdpSocket) -> Self {
        Self { socket }
    }

    /// Encode `packet` and send it to `addr` in a single datagram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the send fails or the datagram is cut short.
    pub fn send_packet(&self, packet: &Packet, addr: SocketAddr) -> Result<usize> {
        match self.socket.send_to(&packet.to_bytes(), addr) {
            Ok(PACKET_SIZE) => Ok(PACKET_SIZE),
            Ok(_) | Err(_) => Err(Error::Network),
        }
    }

    /// Receive one datagram and decode it as an NTP packet.
    ///
    /// Bytes beyond [`PACKET_SIZE`] (extension fields, MACs) are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the receive fails or times out, and
    /// [`Error::IncorrectPayload`] if the datagram is shorter than a packet.
    pub fn recv_packet(&self) -> Result<(Packet, SocketAddr)> {
        let mut buf = [0u8; PACKET_SIZE];

        match self.socket.recv_from(&mut buf) {
            Ok((size, addr)) => Ok((Packet::decode(&buf[..size])?, addr)),
            Err(_) => Err(Error::Network),
        }
    }

    /// Address the wrapped socket is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(|_| Error::Network)
    }
}

impl From<UdpSocket> for UdpSocketWrapper {
    /// Converts a [`std::net::UdpSocket`] into a `UdpSocketWrapper`.
    fn from(socket: UdpSocket) -> Self {
        UdpSocketWrapper::new(socket)
    }
}
