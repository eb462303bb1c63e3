use core::bytes::get16;

/// Calculates the Internet Checksum from [RFC1071](https://tools.ietf.org/html/rfc1071).
///
/// Any checksum field inside `buffer` must be zeroed before calling this, and
/// then overwritten with the result. A buffer which already carries a valid
/// checksum sums to zero.
///
/// See [IPv4 header checksum](https://en.wikipedia.org/wiki/IPv4_header_checksum) for an example.
pub fn internet_checksum(buffer: &[u8]) -> u16 {
    let mut acc = 0 as u32;

    for word in buffer.chunks(2) {
        acc += match word.len() {
            2 => get16(word) as u32,
            _ => (word[0] as u32) << 8,
        };
    }

    while acc >> 16 != 0 {
        acc = (acc & 0xFFFF) + (acc >> 16);
    }

    !acc as u16
}
