//! SNMP protocol version.

/// SNMP protocol version, as carried in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// SNMPv1 (RFC 1157).
    V1,
    /// SNMPv2c (RFC 1901).
    #[default]
    V2c,
    /// SNMPv3 (RFC 3412).
    V3,
}

impl Version {
    /// Wire value of the version field.
    pub fn as_i32(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
            Version::V3 => 3,
        }
    }

    /// Parse the wire value of the version field.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            3 => Some(Version::V3),
            _ => None,
        }
    }

    /// Whether GetBulkRequest-PDU exists in this version.
    pub fn supports_get_bulk(self) -> bool {
        !matches!(self, Version::V1)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "v1"),
            Version::V2c => write!(f, "v2c"),
            Version::V3 => write!(f, "v3"),
        }
    }
}
