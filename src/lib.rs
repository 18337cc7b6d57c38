//! # snmp-bulk
//!
//! Multi-round SNMP GetBulk with per-OID error isolation.
//!
//! A single logical GetBulk over several OIDs is turned into as many
//! GETBULK rounds as it takes for every OID to end up with either its
//! values or an error marker:
//!
//! - Responses are split into non-repeater answers and round-robin
//!   repetitions for the remaining OIDs.
//! - An agent error removes just the offending OID and resends the rest,
//!   bounded by a shared error budget.
//! - The result map is keyed by requested OID and optionally normalized
//!   into native values.
//!
//! Encoding and the network live behind the [`Session`] trait, so the
//! reconciliation logic runs the same against a real socket or the
//! scripted `MockSession` (feature `testing`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_bulk::{BulkOptions, GetBulk, Session, oid};
//!
//! async fn interfaces<S: Session + 'static>(session: S) -> snmp_bulk::Result<()> {
//!     let handle = GetBulk::start(
//!         session,
//!         [
//!             oid!(1, 3, 6, 1, 2, 1, 1, 3),       // sysUpTime
//!             oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2), // ifDescr
//!         ],
//!         BulkOptions::default().non_repeaters(1).max_repetitions(25),
//!     )?;
//!
//!     for (requested, entry) in handle.await? {
//!         match entry {
//!             snmp_bulk::BulkEntry::Values(bindings) => {
//!                 for binding in bindings {
//!                     println!("{requested}: {} = {}", binding.oid, binding.value);
//!                 }
//!             }
//!             snmp_bulk::BulkEntry::Error(err) => println!("{requested}: {err}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod bulk;
pub mod error;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod session;
pub mod value;
pub mod varbind;
pub mod version;

// Re-exports for convenience
pub use bulk::{
    Binding, BulkEntry, BulkHandle, BulkOptions, BulkResponses, EntryError, GetBulk, Payload,
    Progress, RoundState,
};
pub use error::{Error, ErrorStatus, MalformedKind, Result};
pub use message::CommunityMessage;
pub use oid::Oid;
pub use pdu::{GetBulkPdu, Pdu, PduType};
pub use session::{RequestIdAllocator, Session};
pub use value::{Native, Value};
pub use varbind::VarBind;
pub use version::Version;
