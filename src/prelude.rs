//! Common imports for bulk operations.
//!
//! ```rust
//! use snmp_bulk::prelude::*;
//!
//! let options = BulkOptions::default().non_repeaters(1);
//! assert_eq!(options.version, Version::V2c);
//! ```

pub use crate::bulk::{BulkEntry, BulkOptions, BulkResponses, EntryError, GetBulk, Payload};
pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::oid;
pub use crate::oid::Oid;
pub use crate::session::Session;
pub use crate::value::{Native, Value};
pub use crate::version::Version;
