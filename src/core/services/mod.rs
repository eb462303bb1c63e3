//! Packet rewriting services built on top of the headers in `repr`.
//!
//! The `services` module deals with whole packets handed over by a capture or
//! NAT layer: finishing transport checksums and answering pings in place.

pub mod icmpv4;
pub mod ipv4;
