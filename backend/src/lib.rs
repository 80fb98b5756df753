//! Friend relationships and recommendation voting for Recky.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, services
//! and ports, [`outbound`] implements the driven ports, and [`inbound`]
//! exposes the driving ports on the command line.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
