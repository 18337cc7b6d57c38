//! Shared test infrastructure for snmp-bulk.
//!
//! Provides MIB fixtures, response page builders and tracing setup.

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;

pub use fixtures::{
    if_descr, if_in_octets, if_out_octets, interleaved_page, page_response, sys_descr,
    sys_uptime,
};

use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once per binary.
///
/// Respects `RUST_LOG`, e.g. `RUST_LOG=snmp_bulk=trace cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
