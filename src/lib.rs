//! radvd-regen: radvd configuration regenerator
//!
//! A library for expanding a radvd template with the IPv6 prefixes currently
//! assigned to network interfaces, detecting when the published configuration
//! is out of date, and telling the daemon to reload or reset.

pub mod config;
pub mod diff;
pub mod generator;
pub mod notify;
pub mod parser;
pub mod probe;
pub mod resolver;
pub mod session;
pub mod store;
