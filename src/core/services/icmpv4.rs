use {
    Error,
    Result,
};
use core::repr::{
    Icmpv4Header,
    Icmpv4Type,
    Ipv4Header,
};

/// Rewrites an ICMP echo request into its echo reply, in place.
///
/// The echo identifier, sequence number and data after the ICMP header are
/// left untouched, as is anything in buffer past the IPv4 total length.
/// Returns the header of the reply.
pub fn reply_in_place(buffer: &mut [u8]) -> Result<Icmpv4Header> {
    let packet_len = Ipv4Header::packet_len(buffer)?;
    let packet = &mut buffer[.. packet_len];

    let mut icmp_header = Icmpv4Header::deserialize(packet)?;

    match icmp_header.type_of {
        Icmpv4Type::EchoRequest => {}
        type_of => {
            debug!(
                "Ignoring ICMP {} from {}.",
                type_of, icmp_header.ipv4.src_addr
            );
            return Err(Error::NoOp);
        }
    }

    debug!(
        "Got a ping from {}; Rewriting as reply...",
        icmp_header.ipv4.src_addr
    );

    icmp_header.to_response();
    icmp_header.marshal(packet)?;

    Ok(icmp_header)
}
