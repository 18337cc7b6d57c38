//! Community-based SNMP message format (v1/v2c).
//!
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu PDU }`

use crate::pdu::GetBulkPdu;
use crate::version::Version;
use bytes::Bytes;

/// Community-based GetBulk message, ready to hand to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityMessage {
    /// SNMP version
    pub version: Version,
    /// Community string for authentication
    pub community: Bytes,
    /// Protocol data unit
    pub pdu: GetBulkPdu,
}

impl CommunityMessage {
    /// Create a new community message.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: GetBulkPdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Create a V2c message (convenience constructor).
    pub fn v2c(community: impl Into<Bytes>, pdu: GetBulkPdu) -> Self {
        Self::new(Version::V2c, community, pdu)
    }

    /// Request ID of the wrapped PDU.
    pub fn request_id(&self) -> i32 {
        self.pdu.request_id
    }

    /// Consume and return the PDU.
    pub fn into_pdu(self) -> GetBulkPdu {
        self.pdu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_v2c_wraps_pdu() {
        let pdu = GetBulkPdu::new(5, 0, 10, &[oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)]);
        let msg = CommunityMessage::v2c(Bytes::from_static(b"public"), pdu.clone());

        assert_eq!(msg.version, Version::V2c);
        assert_eq!(msg.community.as_ref(), b"public");
        assert_eq!(msg.request_id(), 5);
        assert_eq!(msg.into_pdu(), pdu);
    }
}
