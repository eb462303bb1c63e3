use std;
use std::net::Ipv4Addr;

use {
    Error,
    Result,
};
use core::bytes::{
    get16,
    get32,
    put16,
    put32,
};
use core::check::internet_checksum;
use core::repr::check_buffer_len;

/// [IPv4 address](https://en.wikipedia.org/wiki/IPv4) stored as the integer
/// value of its network byte order representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    /// Creates an IPv4 address from a network byte order buffer.
    pub fn new(addr: [u8; 4]) -> Address {
        Address(get32(&addr[..]))
    }

    /// Returns the network byte order representation of the address.
    pub fn to_bytes(&self) -> [u8; 4] {
        let mut bytes = [0; 4];
        put32(&mut bytes[..], self.0);
        bytes
    }

    /// Checks if the address is in 224.0.0.0/4.
    pub fn is_multicast(&self) -> bool {
        (self.0 >> 24) as u8 & 0xF0 == 0xE0
    }

    /// Checks if the address is in 169.254.0.0/16.
    pub fn is_link_local_unicast(&self) -> bool {
        self.0 >> 16 == 0xA9FE
    }
}

impl From<u32> for Address {
    fn from(addr: u32) -> Address {
        Address(addr)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> u32 {
        addr.0
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Address {
        Address::new(addr.octets())
    }
}

impl From<Address> for Ipv4Addr {
    fn from(addr: Address) -> Ipv4Addr {
        Ipv4Addr::from(addr.0)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl std::str::FromStr for Address {
    type Err = Error;

    /// Parses an Ipv4 address from an A.B.C.D style string.
    fn from_str(addr: &str) -> Result<Address> {
        addr.parse::<Ipv4Addr>()
            .map(Address::from)
            .map_err(|_| Error::Malformed)
    }
}

/// [IP protocol numbers](https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml).
pub mod protocols {
    pub const UNKNOWN: u8 = 0x00;

    pub const ICMP: u8 = 0x01;

    pub const IGMP: u8 = 0x02;

    pub const TCP: u8 = 0x06;

    pub const UDP: u8 = 0x11;

    pub const ICMPV6: u8 = 0x3A;

    /// Unassigned by IANA, used for non-first fragments.
    pub const FRAGMENT: u8 = 0xFF;
}

/// Upper layer protocol carried by an IPv4 packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    Unknown,
    Icmp,
    Igmp,
    Tcp,
    Udp,
    Icmpv6,
    /// A non-first fragment. The protocol field of such packets can not be
    /// trusted to describe the payload, so it is never reported.
    Fragment,
    Unrecognized(u8),
}

impl From<u8> for Protocol {
    fn from(protocol: u8) -> Protocol {
        match protocol {
            protocols::UNKNOWN => Protocol::Unknown,
            protocols::ICMP => Protocol::Icmp,
            protocols::IGMP => Protocol::Igmp,
            protocols::TCP => Protocol::Tcp,
            protocols::UDP => Protocol::Udp,
            protocols::ICMPV6 => Protocol::Icmpv6,
            protocols::FRAGMENT => Protocol::Fragment,
            i => Protocol::Unrecognized(i),
        }
    }
}

impl From<Protocol> for u8 {
    fn from(protocol: Protocol) -> u8 {
        match protocol {
            Protocol::Unknown => protocols::UNKNOWN,
            Protocol::Icmp => protocols::ICMP,
            Protocol::Igmp => protocols::IGMP,
            Protocol::Tcp => protocols::TCP,
            Protocol::Udp => protocols::UDP,
            Protocol::Icmpv6 => protocols::ICMPV6,
            Protocol::Fragment => protocols::FRAGMENT,
            Protocol::Unrecognized(i) => i,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Protocol::Unknown => write!(f, "Unknown"),
            Protocol::Icmp => write!(f, "ICMP"),
            Protocol::Igmp => write!(f, "IGMP"),
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
            Protocol::Icmpv6 => write!(f, "ICMPv6"),
            Protocol::Fragment => write!(f, "Frag"),
            Protocol::Unrecognized(i) => write!(f, "Unrecognized({})", i),
        }
    }
}

/// [https://en.wikipedia.org/wiki/IPv4#Header](https://en.wikipedia.org/wiki/IPv4#Header)
mod fields {
    use std::ops::Range;

    pub const VERSION_AND_HEADER_LEN: usize = 0;

    pub const DSCP_AND_ECN: usize = 1;

    pub const PACKET_LEN: Range<usize> = 2 .. 4;

    pub const IDENTIFICATION: Range<usize> = 4 .. 6;

    pub const FLAGS_AND_FRAGMENT_OFFSET: Range<usize> = 6 .. 8;

    pub const TTL: usize = 8;

    pub const PROTOCOL: usize = 9;

    pub const CHECKSUM: Range<usize> = 10 .. 12;

    pub const SRC_ADDR: Range<usize> = 12 .. 16;

    pub const DST_ADDR: Range<usize> = 16 .. 20;
}

/// Layout of the pseudo-header used to seed TCP and UDP checksums.
mod pseudo_fields {
    use std::ops::Range;

    pub const ZEROS: Range<usize> = 0 .. 8;

    pub const SRC_ADDR: Range<usize> = 8 .. 12;

    pub const DST_ADDR: Range<usize> = 12 .. 16;

    pub const RESERVED: usize = 16;

    pub const PROTOCOL: usize = 17;

    pub const UPPER_LAYER_LEN: Range<usize> = 18 .. 20;
}

/// An IPv4 header without options.
///
/// Everything not represented here is fixed when serialized: no DSCP/ECN, no
/// fragmentation and a TTL of `DEFAULT_TTL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub protocol: Protocol,
    pub ipid: u16,
    pub src_addr: Address,
    pub dst_addr: Address,
}

impl Header {
    pub const LEN: usize = 20;

    pub const DEFAULT_TTL: u8 = 64;

    const FRAGMENT_OFFSET_MASK: u16 = 0x1FFF;

    /// Returns the length of the header when serialized to a buffer.
    pub fn header_len(&self) -> usize {
        Self::LEN
    }

    /// Serializes the header into the front of buffer and calculates the
    /// header checksum.
    ///
    /// The buffer is taken to be the whole packet, so its length is written as
    /// the total length. Nothing is written if the length checks fail.
    pub fn marshal(&self, buffer: &mut [u8]) -> Result<()> {
        check_buffer_len(buffer, Self::LEN)?;

        let packet_len = buffer.len() as u16;

        buffer[fields::VERSION_AND_HEADER_LEN] = 0x40 | (Self::LEN >> 2) as u8;
        buffer[fields::DSCP_AND_ECN] = 0;
        put16(&mut buffer[fields::PACKET_LEN], packet_len);
        put16(&mut buffer[fields::IDENTIFICATION], self.ipid);
        put16(&mut buffer[fields::FLAGS_AND_FRAGMENT_OFFSET], 0);
        buffer[fields::TTL] = Self::DEFAULT_TTL;
        buffer[fields::PROTOCOL] = u8::from(self.protocol);
        put16(&mut buffer[fields::CHECKSUM], 0);
        put32(&mut buffer[fields::SRC_ADDR], u32::from(self.src_addr));
        put32(&mut buffer[fields::DST_ADDR], u32::from(self.dst_addr));

        let checksum = internet_checksum(&buffer[.. Self::LEN]);
        put16(&mut buffer[fields::CHECKSUM], checksum);

        Ok(())
    }

    /// Serializes the pseudo-header used when calculating TCP and UDP
    /// checksums into the first `LEN` bytes of buffer.
    ///
    /// Like `marshal(...)`, the buffer is taken to be the whole packet and the
    /// upper layer length is whatever follows the IPv4 header.
    pub fn marshal_pseudo(&self, buffer: &mut [u8]) -> Result<()> {
        check_buffer_len(buffer, Self::LEN)?;

        let upper_layer_len = (buffer.len() - Self::LEN) as u16;

        for byte in &mut buffer[pseudo_fields::ZEROS] {
            *byte = 0;
        }
        put32(&mut buffer[pseudo_fields::SRC_ADDR], u32::from(self.src_addr));
        put32(&mut buffer[pseudo_fields::DST_ADDR], u32::from(self.dst_addr));
        buffer[pseudo_fields::RESERVED] = 0;
        buffer[pseudo_fields::PROTOCOL] = u8::from(self.protocol);
        put16(&mut buffer[pseudo_fields::UPPER_LAYER_LEN], upper_layer_len);

        Ok(())
    }

    /// Turns the header into one for a reply to the packet it describes.
    ///
    /// Flipping the bits of the identification keeps replies distinct as long
    /// as the requests were, which is all that is promised.
    pub fn to_response(&mut self) {
        std::mem::swap(&mut self.src_addr, &mut self.dst_addr);
        self.ipid = !self.ipid;
    }

    /// Returns the total length of the option-less IPv4 packet at the front of
    /// buffer. Anything in buffer past this length, e.g. link layer padding,
    /// is not part of the packet.
    pub fn packet_len(buffer: &[u8]) -> Result<usize> {
        if buffer.len() < Self::LEN {
            return Err(Error::BufferTooSmall);
        }

        if buffer[fields::VERSION_AND_HEADER_LEN] != 0x40 | (Self::LEN >> 2) as u8 {
            return Err(Error::Malformed);
        }

        let packet_len = get16(&buffer[fields::PACKET_LEN]) as usize;
        if packet_len < Self::LEN || packet_len > buffer.len() {
            return Err(Error::Malformed);
        }

        Ok(packet_len)
    }

    /// Deserializes the header at the front of buffer.
    ///
    /// Only option-less headers are supported. The header checksum must be
    /// valid, and non-first fragments report `Protocol::Fragment`.
    pub fn deserialize(buffer: &[u8]) -> Result<Header> {
        Self::packet_len(buffer)?;

        if internet_checksum(&buffer[.. Self::LEN]) != 0 {
            return Err(Error::Checksum);
        }

        let fragment_offset =
            get16(&buffer[fields::FLAGS_AND_FRAGMENT_OFFSET]) & Self::FRAGMENT_OFFSET_MASK;
        let protocol = if fragment_offset != 0 {
            Protocol::Fragment
        } else {
            Protocol::from(buffer[fields::PROTOCOL])
        };

        Ok(Header {
            protocol,
            ipid: get16(&buffer[fields::IDENTIFICATION]),
            src_addr: Address::from(get32(&buffer[fields::SRC_ADDR])),
            dst_addr: Address::from(get32(&buffer[fields::DST_ADDR])),
        })
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{{{} > {}}}", self.protocol, self.src_addr, self.dst_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp_header() -> Header {
        Header {
            protocol: Protocol::Tcp,
            ipid: 0x1234,
            src_addr: Address::new([10, 0, 0, 1]),
            dst_addr: Address::new([10, 0, 0, 2]),
        }
    }

    #[test]
    fn test_address_display() {
        assert_eq!("192.168.1.254", Address::new([192, 168, 1, 254]).to_string());
        assert_eq!("0.0.0.0", Address::from(0u32).to_string());
        assert_eq!("255.255.255.255", Address::from(!0u32).to_string());
    }

    #[test]
    fn test_address_integer_value() {
        assert_eq!(0x0A000001, u32::from(Address::new([10, 0, 0, 1])));
        assert_eq!([10, 0, 0, 1], Address::from(0x0A000001u32).to_bytes());
    }

    #[test]
    fn test_address_std_conversions() {
        let addr = Address::from(Ipv4Addr::new(172, 16, 4, 2));
        assert_eq!(Address::new([172, 16, 4, 2]), addr);
        assert_eq!(Ipv4Addr::new(172, 16, 4, 2), Ipv4Addr::from(addr));
    }

    #[test]
    fn test_address_from_str() {
        assert_eq!(Ok(Address::new([10, 0, 0, 1])), "10.0.0.1".parse::<Address>());
        assert_matches!("10.0.0".parse::<Address>(), Err(Error::Malformed));
        assert_matches!("10.0.0.256".parse::<Address>(), Err(Error::Malformed));
    }

    #[test]
    fn test_address_multicast() {
        assert!(Address::new([224, 0, 0, 1]).is_multicast());
        assert!(Address::new([239, 255, 255, 250]).is_multicast());
        assert!(!Address::new([10, 0, 0, 1]).is_multicast());
        assert!(!Address::new([240, 0, 0, 1]).is_multicast());
    }

    #[test]
    fn test_address_link_local_unicast() {
        assert!(Address::new([169, 254, 1, 1]).is_link_local_unicast());
        assert!(!Address::new([169, 253, 1, 1]).is_link_local_unicast());
        assert!(!Address::new([170, 254, 1, 1]).is_link_local_unicast());
    }

    #[test]
    fn test_protocol_numbers() {
        assert_eq!(Protocol::Tcp, Protocol::from(6u8));
        assert_eq!(Protocol::Udp, Protocol::from(17u8));
        assert_eq!(Protocol::Icmpv6, Protocol::from(0x3Au8));
        assert_eq!(Protocol::Fragment, Protocol::from(0xFFu8));
        assert_eq!(Protocol::Unrecognized(0x84), Protocol::from(0x84u8));
        assert_eq!(0x84, u8::from(Protocol::Unrecognized(0x84)));
        assert_eq!(0, u8::from(Protocol::Unknown));
    }

    #[test]
    fn test_protocol_display() {
        assert_eq!("ICMP", Protocol::Icmp.to_string());
        assert_eq!("Frag", Protocol::Fragment.to_string());
        assert_eq!("Unrecognized(132)", Protocol::Unrecognized(132).to_string());
    }

    #[test]
    fn test_marshal() {
        let mut buffer = [0xFF; 20];
        assert_matches!(tcp_header().marshal(&mut buffer[..]), Ok(()));
        assert_eq!(
            &buffer[..],
            &[
                0x45, 0x00, 0x00, 0x14, 0x12, 0x34, 0x00, 0x00, 0x40, 0x06, 0x54, 0xAE, 0x0A, 0x00,
                0x00, 0x01, 0x0A, 0x00, 0x00, 0x02,
            ][..]
        );
        assert_eq!(0, internet_checksum(&buffer[..]));
    }

    #[test]
    fn test_marshal_total_len_is_buffer_len() {
        let mut buffer = [0; 1500];
        tcp_header().marshal(&mut buffer[..]).unwrap();
        assert_eq!(1500, get16(&buffer[2 .. 4]));
        assert_eq!(0, internet_checksum(&buffer[.. 20]));
    }

    #[test]
    fn test_marshal_buffer_too_small() {
        let mut buffer = [0xAB; 19];
        assert_matches!(
            tcp_header().marshal(&mut buffer[..]),
            Err(Error::BufferTooSmall)
        );
        assert!(buffer.iter().all(|byte| *byte == 0xAB));
    }

    #[test]
    fn test_marshal_packet_too_large() {
        let mut buffer = vec![0xAB; 65536];
        assert_matches!(
            tcp_header().marshal(&mut buffer[..]),
            Err(Error::PacketTooLarge)
        );
        assert!(buffer.iter().all(|byte| *byte == 0xAB));
    }

    #[test]
    fn test_marshal_pseudo() {
        let header = Header {
            protocol: Protocol::Udp,
            ipid: 0xFFFF,
            src_addr: Address::new([192, 168, 0, 1]),
            dst_addr: Address::new([192, 168, 0, 199]),
        };
        let mut buffer = [0xAA; 28];
        assert_matches!(header.marshal_pseudo(&mut buffer[..]), Ok(()));
        assert_eq!(
            &buffer[..],
            &[
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0xA8, 0x00, 0x01, 0xC0, 0xA8,
                0x00, 0xC7, 0x00, 0x11, 0x00, 0x08, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
            ][..]
        );
    }

    #[test]
    fn test_marshal_pseudo_length_checks() {
        let mut buffer = [0xAB; 12];
        assert_matches!(
            tcp_header().marshal_pseudo(&mut buffer[..]),
            Err(Error::BufferTooSmall)
        );
        assert_eq!([0xAB; 12], buffer);

        let mut buffer = vec![0xAB; 70000];
        assert_matches!(
            tcp_header().marshal_pseudo(&mut buffer[..]),
            Err(Error::PacketTooLarge)
        );
    }

    #[test]
    fn test_to_response() {
        let mut header = tcp_header();
        header.to_response();
        assert_eq!(Address::new([10, 0, 0, 2]), header.src_addr);
        assert_eq!(Address::new([10, 0, 0, 1]), header.dst_addr);
        assert_eq!(0xEDCB, header.ipid);
        assert_eq!(Protocol::Tcp, header.protocol);

        header.to_response();
        assert_eq!(tcp_header(), header);
    }

    #[test]
    fn test_deserialize() {
        let mut buffer = [0; 60];
        tcp_header().marshal(&mut buffer[..]).unwrap();
        assert_eq!(Ok(tcp_header()), Header::deserialize(&buffer[..]));
    }

    #[test]
    fn test_deserialize_invalid_checksum() {
        let mut buffer = [0; 20];
        tcp_header().marshal(&mut buffer[..]).unwrap();
        buffer[8] = 1;
        assert_matches!(Header::deserialize(&buffer[..]), Err(Error::Checksum));
    }

    #[test]
    fn test_deserialize_with_options() {
        let mut buffer = [0; 24];
        tcp_header().marshal(&mut buffer[..]).unwrap();
        buffer[0] = 0x46;
        assert_matches!(Header::deserialize(&buffer[..]), Err(Error::Malformed));
    }

    #[test]
    fn test_deserialize_truncated() {
        let mut buffer = [0; 40];
        tcp_header().marshal(&mut buffer[..]).unwrap();
        assert_matches!(Header::deserialize(&buffer[.. 39]), Err(Error::Malformed));
        assert_matches!(Header::deserialize(&buffer[.. 19]), Err(Error::BufferTooSmall));
    }

    #[test]
    fn test_packet_len_excludes_padding() {
        let mut buffer = [0x11; 46];
        tcp_header().marshal(&mut buffer[.. 40]).unwrap();
        assert_eq!(Ok(40), Header::packet_len(&buffer[..]));
        assert_eq!(Ok(tcp_header()), Header::deserialize(&buffer[..]));
        assert_matches!(Header::packet_len(&buffer[.. 10]), Err(Error::BufferTooSmall));
    }

    #[test]
    fn test_deserialize_fragment() {
        let mut buffer = [0; 20];
        tcp_header().marshal(&mut buffer[..]).unwrap();
        put16(&mut buffer[6 .. 8], 0x00B9);
        put16(&mut buffer[10 .. 12], 0);
        let checksum = internet_checksum(&buffer[..]);
        put16(&mut buffer[10 .. 12], checksum);

        let header = Header::deserialize(&buffer[..]).unwrap();
        assert_eq!(Protocol::Fragment, header.protocol);
    }

    #[test]
    fn test_header_display() {
        assert_eq!("TCP{10.0.0.1 > 10.0.0.2}", tcp_header().to_string());
    }
}
