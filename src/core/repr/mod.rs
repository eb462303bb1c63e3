//! Serialization and deserialization of packet headers.
//!
//! The `repr` module provides fixed layout IPv4 and ICMPv4 headers which are
//! written to/read from caller owned byte buffers. Each buffer is taken to be
//! an entire packet.

pub mod icmpv4;
pub mod ipv4;

pub use self::icmpv4::{
    Code as Icmpv4Code,
    Header as Icmpv4Header,
    Type as Icmpv4Type,
};
pub use self::ipv4::{
    Address as Ipv4Address,
    Header as Ipv4Header,
    Protocol as Ipv4Protocol,
    protocols as ipv4_protocols,
};

use {
    Error,
    Result,
};

/// The largest buffer a header will be serialized into, bounded by the 16 bit
/// IPv4 total length field.
pub const MAX_PACKET_LEN: usize = 65535;

/// Ensures a buffer can hold a header of header_len bytes and still describe a
/// single IPv4 packet.
fn check_buffer_len(buffer: &[u8], header_len: usize) -> Result<()> {
    if buffer.len() < header_len {
        Err(Error::BufferTooSmall)
    } else if buffer.len() > MAX_PACKET_LEN {
        Err(Error::PacketTooLarge)
    } else {
        Ok(())
    }
}
