//! Standard test fixtures with realistic MIB data.

use snmp_bulk::session::ResponseBuilder;
use snmp_bulk::{Oid, Pdu, Value, oid};

// =============================================================================
// OID fixtures
// =============================================================================

/// sysDescr (1.3.6.1.2.1.1.1), without the instance suffix.
pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1)
}

/// sysUpTime (1.3.6.1.2.1.1.3), without the instance suffix.
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3)
}

/// ifDescr column (1.3.6.1.2.1.2.2.1.2).
pub fn if_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)
}

/// ifInOctets column (1.3.6.1.2.1.2.2.1.10).
pub fn if_in_octets() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10)
}

/// ifOutOctets column (1.3.6.1.2.1.2.2.1.16).
pub fn if_out_octets() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 16)
}

// =============================================================================
// Response pages
// =============================================================================

/// Repeater bindings for `rows` table rows, interleaved the way an agent
/// lays out a GETBULK page: row 1 of every column, then row 2, and so on.
///
/// Each value is `Counter32(row * 100 + column_position)`.
pub fn interleaved_page(columns: &[Oid], rows: u32) -> Vec<(Oid, Value)> {
    let mut page = Vec::with_capacity(columns.len() * rows as usize);
    for row in 1..=rows {
        for (position, column) in columns.iter().enumerate() {
            page.push((column.child(row), Value::Counter32(row * 100 + position as u32)));
        }
    }
    page
}

/// Build a successful response from a list of bindings.
pub fn page_response(bindings: impl IntoIterator<Item = (Oid, Value)>) -> Pdu {
    bindings
        .into_iter()
        .fold(ResponseBuilder::new(), |builder, (oid, value)| {
            builder.varbind(oid, value)
        })
        .build()
}
