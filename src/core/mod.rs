//! Core, platform independent packet header code.

pub mod bytes;
pub mod check;
pub mod repr;
pub mod services;
