//! SNMP Protocol Data Units (PDUs).
//!
//! Only the two PDUs a GetBulk exchange needs are modelled: the outgoing
//! [`GetBulkPdu`] and the agent's [`Pdu`] response. Encoding them is the
//! session's job.

use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::varbind::VarBind;

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    Response = 0xA2,
    GetBulkRequest = 0xA5,
    Report = 0xA8,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA2 => Some(Self::Response),
            0xA5 => Some(Self::GetBulkRequest),
            0xA8 => Some(Self::Report),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Response => write!(f, "Response"),
            Self::GetBulkRequest => write!(f, "GetBulkRequest"),
            Self::Report => write!(f, "Report"),
        }
    }
}

/// Response PDU as seen by the reconciler.
#[derive(Debug, Clone)]
pub struct Pdu {
    /// PDU type
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses
    pub request_id: i32,
    /// Error status (0 when the agent answered every binding)
    pub error_status: i32,
    /// Error index (1-based index of the offending request binding)
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Create a successful Response PDU.
    pub fn response(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a Response PDU carrying an agent error.
    pub fn error_response(
        request_id: i32,
        status: ErrorStatus,
        error_index: i32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: status.as_i32(),
            error_index,
            varbinds,
        }
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }
}

/// GETBULK request PDU.
///
/// Carries `non_repeaters` and `max_repetitions` in the slots a regular PDU
/// uses for error-status and error-index.
#[derive(Debug, Clone, PartialEq)]
pub struct GetBulkPdu {
    /// Request ID
    pub request_id: i32,
    /// Number of non-repeating OIDs
    pub non_repeaters: i32,
    /// Maximum repetitions for repeating OIDs
    pub max_repetitions: i32,
    /// Variable bindings (NULL-valued)
    pub varbinds: Vec<VarBind>,
}

impl GetBulkPdu {
    /// Create a new GETBULK request.
    pub fn new(request_id: i32, non_repeaters: i32, max_repetitions: i32, oids: &[Oid]) -> Self {
        Self {
            request_id,
            non_repeaters,
            max_repetitions,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// OIDs requested, in binding order.
    pub fn oids(&self) -> impl Iterator<Item = &Oid> {
        self.varbinds.iter().map(|vb| &vb.oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;

    #[test]
    fn test_get_bulk_placeholders() {
        let oids = [oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)];
        let pdu = GetBulkPdu::new(42, 1, 10, &oids);

        assert_eq!(pdu.request_id, 42);
        assert_eq!(pdu.non_repeaters, 1);
        assert_eq!(pdu.max_repetitions, 10);
        assert!(pdu.varbinds.iter().all(|vb| vb.value == Value::Null));
        assert!(pdu.oids().eq(oids.iter()));
    }

    #[test]
    fn test_error_response() {
        let pdu = Pdu::error_response(9, ErrorStatus::NoSuchName, 2, Vec::new());
        assert!(pdu.is_error());
        assert_eq!(pdu.error_status_enum(), ErrorStatus::NoSuchName);
        assert_eq!(pdu.error_index, 2);

        assert!(!Pdu::response(9, Vec::new()).is_error());
    }

    #[test]
    fn test_pdu_type_tags() {
        for t in [PduType::Response, PduType::GetBulkRequest, PduType::Report] {
            assert_eq!(PduType::from_tag(t.tag()), Some(t));
        }
        assert_eq!(PduType::from_tag(0xA0), None);
    }
}
