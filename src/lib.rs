#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate byteorder;
#[macro_use]
extern crate log;

pub mod core;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Indicates a buffer shorter than the header being written or read.
    BufferTooSmall,
    /// Indicates a buffer longer than the maximum IPv4 packet length.
    PacketTooLarge,
    /// Indicates an error where a packet is malformed or unsupported.
    Malformed,
    /// Indicates an error where a checksum is invalid.
    Checksum,
    /// Indicates an error where the operation was not performed.
    NoOp,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BufferTooSmall => write!(f, "buffer too small"),
            Error::PacketTooLarge => write!(f, "packet too large"),
            Error::Malformed => write!(f, "malformed packet"),
            Error::Checksum => write!(f, "invalid checksum"),
            Error::NoOp => write!(f, "operation not performed"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
