//! Network byte order helpers.
//!
//! Slices must have exactly (or at least) the width of the integer; callers
//! validate buffer lengths before reaching for these.

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

pub fn put16(buffer: &mut [u8], value: u16) {
    NetworkEndian::write_u16(buffer, value)
}

pub fn put32(buffer: &mut [u8], value: u32) {
    NetworkEndian::write_u32(buffer, value)
}

pub fn get16(buffer: &[u8]) -> u16 {
    NetworkEndian::read_u16(buffer)
}

pub fn get32(buffer: &[u8]) -> u32 {
    NetworkEndian::read_u32(buffer)
}
