//! SA identity keys.

use std::fmt;
use std::net::IpAddr;

/// IPsec protocol carried by a tunnel-level SA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Encapsulating Security Payload.
    Esp,
    /// Authentication Header.
    Ah,
}

impl Protocol {
    /// Wire-convention name used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Esp => "ESP",
            Self::Ah => "AH",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a session-level SA: its SPI pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IkeSaId {
    /// SPI chosen by the exchange initiator.
    pub initiator_spi: u64,
    /// SPI chosen by the responder.
    pub responder_spi: u64,
}

impl IkeSaId {
    /// Create a session identity from its SPI pair.
    #[must_use]
    pub const fn new(initiator_spi: u64, responder_spi: u64) -> Self {
        Self {
            initiator_spi,
            responder_spi,
        }
    }
}

impl fmt::Display for IkeSaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:016x}_i {:016x}_r",
            self.initiator_spi, self.responder_spi
        )
    }
}

/// Identity of a tunnel-level SA: (protocol, inbound SPI, destination).
///
/// This is the key the daemon's child index is built on. All three fields
/// are plain values, so a job can own a copy outliving the network event
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildSaKey {
    /// IPsec protocol of the tunnel.
    pub protocol: Protocol,
    /// Inbound SPI of the tunnel.
    pub spi: u32,
    /// Destination address of the SA.
    pub dst: IpAddr,
}

impl ChildSaKey {
    /// Create a tunnel identity key.
    #[must_use]
    pub const fn new(protocol: Protocol, spi: u32, dst: IpAddr) -> Self {
        Self { protocol, spi, dst }
    }
}

impl fmt::Display for ChildSaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/0x{:08x}/{}", self.protocol, self.spi, self.dst)
    }
}
