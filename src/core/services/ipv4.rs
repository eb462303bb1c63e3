use {
    Error,
    Result,
};
use core::bytes::put16;
use core::check::internet_checksum;
use core::repr::{
    Ipv4Header,
    Ipv4Protocol,
    MAX_PACKET_LEN,
};

/// Finishes a TCP or UDP packet whose transport segment is already written
/// after the first `Ipv4Header::LEN` bytes of buffer.
///
/// The transport checksum at `checksum_at` (relative to the start of the
/// segment) is calculated with the IPv4 pseudo-header as a seed, after which
/// the real IPv4 header is serialized over the pseudo-header. Returns the
/// transport checksum. Nothing is written if the buffer can not hold the
/// checksum field.
pub fn seal_transport(
    ipv4_header: &Ipv4Header,
    buffer: &mut [u8],
    checksum_at: usize,
) -> Result<u16> {
    let checksum_field = match Ipv4Header::LEN
        .checked_add(checksum_at)
        .and_then(|start| start.checked_add(2).map(|end| start .. end))
    {
        Some(field) => field,
        None => return Err(Error::BufferTooSmall),
    };

    if buffer.len() < checksum_field.end {
        return Err(Error::BufferTooSmall);
    } else if buffer.len() > MAX_PACKET_LEN {
        return Err(Error::PacketTooLarge);
    }

    ipv4_header.marshal_pseudo(buffer)?;
    put16(&mut buffer[checksum_field.clone()], 0);

    let mut checksum = internet_checksum(buffer);
    // A zero UDP checksum means no checksum was calculated (RFC768).
    if checksum == 0 && ipv4_header.protocol == Ipv4Protocol::Udp {
        checksum = 0xFFFF;
    }
    put16(&mut buffer[checksum_field], checksum);

    ipv4_header.marshal(buffer)?;

    trace!(
        "Sealed {} packet of {} bytes with checksum {:#06x}.",
        ipv4_header,
        buffer.len(),
        checksum
    );

    Ok(checksum)
}
