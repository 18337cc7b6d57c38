//! SNMP message wrappers.
//!
//! Messages encapsulate PDUs with version and authentication information.
//! Only the community-based form (v2c) is used for GetBulk here.

mod community;

pub use community::CommunityMessage;
