use std;

use {
    Error,
    Result,
};
use core::bytes::put16;
use core::check::internet_checksum;
use core::repr::check_buffer_len;
use core::repr::ipv4::{
    Header as Ipv4Header,
    Protocol,
};

/// ICMP message type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    EchoReply,
    Unreachable,
    EchoRequest,
    TimeExceeded,
    Unrecognized(u8),
}

impl From<u8> for Type {
    fn from(type_of: u8) -> Type {
        match type_of {
            0 => Type::EchoReply,
            3 => Type::Unreachable,
            8 => Type::EchoRequest,
            11 => Type::TimeExceeded,
            i => Type::Unrecognized(i),
        }
    }
}

impl From<Type> for u8 {
    fn from(type_of: Type) -> u8 {
        match type_of {
            Type::EchoReply => 0,
            Type::Unreachable => 3,
            Type::EchoRequest => 8,
            Type::TimeExceeded => 11,
            Type::Unrecognized(i) => i,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Type::EchoReply => write!(f, "EchoReply"),
            Type::Unreachable => write!(f, "Unreachable"),
            Type::EchoRequest => write!(f, "EchoRequest"),
            Type::TimeExceeded => write!(f, "TimeExceeded"),
            Type::Unrecognized(i) => write!(f, "Unrecognized({})", i),
        }
    }
}

/// ICMP message code. Only the code shared by echo messages is named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Code {
    NoCode,
    Unrecognized(u8),
}

impl From<u8> for Code {
    fn from(code: u8) -> Code {
        match code {
            0 => Code::NoCode,
            i => Code::Unrecognized(i),
        }
    }
}

impl From<Code> for u8 {
    fn from(code: Code) -> u8 {
        match code {
            Code::NoCode => 0,
            Code::Unrecognized(i) => i,
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Code::NoCode => write!(f, "NoCode"),
            Code::Unrecognized(i) => write!(f, "Unrecognized({})", i),
        }
    }
}

/// Offsets of the ICMP fields, which directly follow the IPv4 header.
///
/// [https://en.wikipedia.org/wiki/Internet_Control_Message_Protocol](https://en.wikipedia.org/wiki/Internet_Control_Message_Protocol)
mod fields {
    use std::ops::Range;

    pub const TYPE: usize = 20;

    pub const CODE: usize = 21;

    pub const CHECKSUM: Range<usize> = 22 .. 24;
}

/// An IPv4 header followed by the type, code and checksum of an ICMP message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// The protocol of this header is ignored and always serialized as ICMP.
    pub ipv4: Ipv4Header,
    pub type_of: Type,
    pub code: Code,
}

impl Header {
    pub const LEN: usize = Ipv4Header::LEN + 4;

    /// Returns the length of the IPv4 and ICMP headers when serialized to a
    /// buffer.
    pub fn header_len(&self) -> usize {
        Self::LEN
    }

    /// Serializes the IPv4 and ICMP headers into the front of buffer.
    ///
    /// The ICMP checksum covers the entire buffer, IPv4 header included, so
    /// the IPv4 header is serialized first. Anything past `LEN` should hold
    /// the rest of the ICMP message already.
    pub fn marshal(&self, buffer: &mut [u8]) -> Result<()> {
        check_buffer_len(buffer, Self::LEN)?;

        let mut ipv4 = self.ipv4;
        ipv4.protocol = Protocol::Icmp;

        buffer[fields::TYPE] = u8::from(self.type_of);
        buffer[fields::CODE] = u8::from(self.code);
        put16(&mut buffer[fields::CHECKSUM], 0);

        ipv4.marshal(buffer)?;

        let checksum = internet_checksum(buffer);
        put16(&mut buffer[fields::CHECKSUM], checksum);

        Ok(())
    }

    /// Turns an echo request into the header of its echo reply.
    ///
    /// This assumes the header describes an echo request. Unreachable and time
    /// exceeded messages are never answered, and get no special treatment.
    pub fn to_response(&mut self) {
        self.type_of = Type::EchoReply;
        self.code = Code::NoCode;
        self.ipv4.to_response();
    }

    /// Deserializes the IPv4 and ICMP headers at the front of buffer, checking
    /// both checksums.
    ///
    /// The ICMP checksum covers the packet up to the IPv4 total length, bytes
    /// past it are ignored.
    pub fn deserialize(buffer: &[u8]) -> Result<Header> {
        let ipv4 = Ipv4Header::deserialize(buffer)?;

        if ipv4.protocol != Protocol::Icmp {
            return Err(Error::Malformed);
        }

        let packet = &buffer[.. Ipv4Header::packet_len(buffer)?];
        if packet.len() < Self::LEN {
            return Err(Error::BufferTooSmall);
        }

        if internet_checksum(packet) != 0 {
            return Err(Error::Checksum);
        }

        Ok(Header {
            ipv4,
            type_of: Type::from(packet[fields::TYPE]),
            code: Code::from(packet[fields::CODE]),
        })
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}{{{} > {}}} {}",
            Protocol::Icmp, self.ipv4.src_addr, self.ipv4.dst_addr, self.type_of
        )
    }
}
