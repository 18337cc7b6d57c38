//! SNMP value types.
//!
//! [`Value`] is the wire-level representation of every SMIv2 type, including
//! the v2c exception values. [`Native`] is the caller-friendly form a value
//! can be normalized into when a bulk operation is not run in raw mode.

use crate::oid::Oid;
use bytes::Bytes;
use std::fmt::Write as _;
use std::net::Ipv4Addr;

/// SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (signed 32-bit)
    Integer(i32),

    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),

    /// NULL
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, big-endian)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds)
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping). SNMPv2c and later only.
    Counter64(u64),

    /// noSuchObject exception.
    NoSuchObject,

    /// noSuchInstance exception.
    NoSuchInstance,

    /// endOfMibView exception.
    ///
    /// Returned for a repeater once the agent walks off the end of its MIB
    /// view. A GetBulk response keeps these bindings in place so the
    /// round-robin layout of the page is preserved.
    EndOfMibView,

    /// Unrecognized value type, kept for forward compatibility.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Try to get as i32.
    ///
    /// ```
    /// use snmp_bulk::Value;
    ///
    /// assert_eq!(Value::Integer(-100).as_i32(), Some(-100));
    /// assert_eq!(Value::Counter32(42).as_i32(), None);
    /// ```
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    ///
    /// Works for Counter32, Gauge32, TimeTicks and non-negative Integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v),
            Value::Integer(v) if *v >= 0 => Some(*v as u32),
            _ => None,
        }
    }

    /// Try to get as u64.
    ///
    /// Works for Counter64 plus everything [`as_u32`](Self::as_u32) accepts.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            other => other.as_u32().map(u64::from),
        }
    }

    /// Try to get as bytes (OctetString or Opaque).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) | Value::Opaque(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as UTF-8 string.
    ///
    /// ```
    /// use snmp_bulk::Value;
    /// use bytes::Bytes;
    ///
    /// let v = Value::OctetString(Bytes::from_static(b"eth0"));
    /// assert_eq!(v.as_str(), Some("eth0"));
    ///
    /// let v = Value::OctetString(Bytes::from_static(&[0xFF, 0xFE]));
    /// assert_eq!(v.as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Try to get as OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Try to get as IP address.
    pub fn as_ip(&self) -> Option<Ipv4Addr> {
        match self {
            Value::IpAddress(bytes) => Some(Ipv4Addr::from(*bytes)),
            _ => None,
        }
    }

    /// Check if this is an exception value.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Convert to the caller-friendly representation, if this type has one.
    ///
    /// Numbers become plain integers, printable octet strings become
    /// `String`, addresses become [`Ipv4Addr`]. Types without a natural
    /// native form (NULL, OIDs, Opaque, exceptions, unknown tags) return
    /// `None` and are left raw by normalization.
    ///
    /// ```
    /// use snmp_bulk::{Native, Value};
    ///
    /// assert_eq!(Value::Gauge32(1000).to_native(), Some(Native::Unsigned(1000)));
    /// assert_eq!(Value::from("up").to_native(), Some(Native::Text("up".into())));
    /// assert_eq!(Value::EndOfMibView.to_native(), None);
    /// ```
    pub fn to_native(&self) -> Option<Native> {
        match self {
            Value::Integer(v) => Some(Native::Signed(i64::from(*v))),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => {
                Some(Native::Unsigned(u64::from(*v)))
            }
            Value::Counter64(v) => Some(Native::Unsigned(*v)),
            Value::OctetString(data) => Some(match std::str::from_utf8(data) {
                Ok(s) => Native::Text(s.to_owned()),
                Err(_) => Native::Bytes(data.clone()),
            }),
            Value::IpAddress(addr) => Some(Native::Ip(Ipv4Addr::from(*addr))),
            Value::Null
            | Value::ObjectIdentifier(_)
            | Value::Opaque(_)
            | Value::NoSuchObject
            | Value::NoSuchInstance
            | Value::EndOfMibView
            | Value::Unknown { .. } => None,
        }
    }
}

/// Normalized value, as produced by [`Value::to_native`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Native {
    /// INTEGER.
    Signed(i64),
    /// Counter32, Gauge32, TimeTicks, Counter64.
    Unsigned(u64),
    /// OCTET STRING holding valid UTF-8.
    Text(String),
    /// OCTET STRING that is not UTF-8.
    Bytes(Bytes),
    /// IpAddress.
    Ip(Ipv4Addr),
}

impl std::fmt::Display for Native {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Native::Signed(v) => write!(f, "{}", v),
            Native::Unsigned(v) => write!(f, "{}", v),
            Native::Text(s) => write!(f, "{}", s),
            Native::Bytes(data) => write!(f, "0x{}", hex(data)),
            Native::Ip(addr) => write!(f, "{}", addr),
        }
    }
}

fn hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "0x{}", hex(data)),
            },
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => write!(f, "{}", Ipv4Addr::from(*addr)),
            Value::Counter32(v) | Value::Gauge32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                let days = secs / 86400;
                let hours = (secs % 86400) / 3600;
                let mins = (secs % 3600) / 60;
                write!(f, "{}d {}h {}m {}s", days, hours, mins, secs % 60)
            }
            Value::Opaque(data) => write!(f, "Opaque(0x{})", hex(data)),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "Unknown(tag=0x{:02X}, data=0x{})", tag, hex(data))
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(addr: Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Counter64(v)
    }
}
