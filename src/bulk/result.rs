//! Result map of a bulk operation.

use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::value::{Native, Value};
use std::collections::HashMap;
use std::collections::hash_map;

/// Value carried by a [`Binding`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Value exactly as the agent returned it.
    Raw(Value),
    /// Value converted by [`Value::to_native`].
    Native(Native),
}

impl Payload {
    /// Pass the payload through the value's normalization hook.
    ///
    /// Raw values with a native form are converted. Raw values without one,
    /// and payloads that are already native, come back unchanged.
    ///
    /// ```
    /// use snmp_bulk::bulk::Payload;
    /// use snmp_bulk::{Native, Value};
    ///
    /// let counter = Payload::Raw(Value::Counter32(5)).normalize();
    /// assert_eq!(counter, Payload::Native(Native::Unsigned(5)));
    ///
    /// let end = Payload::Raw(Value::EndOfMibView).normalize();
    /// assert_eq!(end, Payload::Raw(Value::EndOfMibView));
    /// ```
    pub fn normalize(self) -> Payload {
        match self {
            Payload::Raw(value) => match value.to_native() {
                Some(native) => Payload::Native(native),
                None => Payload::Raw(value),
            },
            native @ Payload::Native(_) => native,
        }
    }

    /// The raw value, if this payload was not normalized.
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Payload::Raw(value) => Some(value),
            Payload::Native(_) => None,
        }
    }

    /// The native value, if this payload was normalized.
    pub fn as_native(&self) -> Option<&Native> {
        match self {
            Payload::Native(native) => Some(native),
            Payload::Raw(_) => None,
        }
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Raw(value) => write!(f, "{}", value),
            Payload::Native(native) => write!(f, "{}", native),
        }
    }
}

/// One (returned OID, value) pair recorded for a requested OID.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// OID the agent returned (the successor of the requested OID).
    pub oid: Oid,
    /// Returned value.
    pub value: Payload,
}

impl Binding {
    pub(crate) fn raw(oid: Oid, value: Value) -> Self {
        Self {
            oid,
            value: Payload::Raw(value),
        }
    }
}

/// Why a requested OID has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryError {
    /// The agent pointed its error index at this OID.
    Agent(ErrorStatus),
    /// The OID was still pending when the error budget ran out.
    RetriesExhausted,
}

impl EntryError {
    /// Status to report on the wire for this entry.
    ///
    /// Exhausted entries report `genErr`.
    pub fn status(&self) -> ErrorStatus {
        match self {
            EntryError::Agent(status) => *status,
            EntryError::RetriesExhausted => ErrorStatus::GenErr,
        }
    }
}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryError::Agent(status) => write!(f, "{}", status),
            EntryError::RetriesExhausted => write!(f, "error retries exhausted"),
        }
    }
}

/// Outcome for one requested OID.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkEntry {
    /// Bindings in the order the agent returned them.
    ///
    /// A non-repeater holds one binding. A repeater holds up to
    /// max-repetitions bindings, or none when the response page ran out
    /// before reaching it.
    Values(Vec<Binding>),
    /// The OID could not be answered.
    Error(EntryError),
}

impl BulkEntry {
    /// Bindings, or `None` for an error entry.
    pub fn values(&self) -> Option<&[Binding]> {
        match self {
            BulkEntry::Values(bindings) => Some(bindings),
            BulkEntry::Error(_) => None,
        }
    }

    /// Error marker, or `None` for a value entry.
    pub fn error(&self) -> Option<EntryError> {
        match self {
            BulkEntry::Error(err) => Some(*err),
            BulkEntry::Values(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BulkEntry::Error(_))
    }

    fn normalize(&mut self) {
        if let BulkEntry::Values(bindings) = self {
            for binding in bindings.iter_mut() {
                let payload = std::mem::replace(&mut binding.value, Payload::Raw(Value::Null));
                binding.value = payload.normalize();
            }
        }
    }
}

/// Map from requested OID (canonical dotted string) to its outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkResponses {
    entries: HashMap<String, BulkEntry>,
}

impl BulkResponses {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for a requested OID.
    pub fn get(&self, oid: &Oid) -> Option<&BulkEntry> {
        self.entries.get(&oid.to_string())
    }

    /// Look up the entry by its dotted key.
    pub fn get_key(&self, key: &str) -> Option<&BulkEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, entry)` pairs in unspecified order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, BulkEntry> {
        self.entries.iter()
    }

    /// Number of entries that carry an error marker.
    pub fn error_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_error()).count()
    }

    pub fn into_inner(self) -> HashMap<String, BulkEntry> {
        self.entries
    }

    /// Record a single-binding answer, replacing whatever was there.
    pub(crate) fn set_single(&mut self, requested: &Oid, binding: Binding) {
        self.entries
            .insert(requested.to_string(), BulkEntry::Values(vec![binding]));
    }

    /// Append a repetition to a requested OID's value list.
    ///
    /// An error entry left over from an earlier round is replaced, since the
    /// OID has now been answered.
    pub(crate) fn append(&mut self, requested: &Oid, binding: Binding) {
        let entry = self.values_entry(requested);
        if let BulkEntry::Values(bindings) = entry {
            bindings.push(binding);
        }
    }

    /// Make sure a requested OID has a value entry, even an empty one.
    pub(crate) fn values_entry(&mut self, requested: &Oid) -> &mut BulkEntry {
        let entry = self
            .entries
            .entry(requested.to_string())
            .or_insert_with(|| BulkEntry::Values(Vec::new()));
        if entry.is_error() {
            *entry = BulkEntry::Values(Vec::new());
        }
        entry
    }

    pub(crate) fn set_error(&mut self, requested: &Oid, error: EntryError) {
        self.entries
            .insert(requested.to_string(), BulkEntry::Error(error));
    }

    pub(crate) fn normalize(&mut self) {
        for entry in self.entries.values_mut() {
            entry.normalize();
        }
    }
}

impl IntoIterator for BulkResponses {
    type Item = (String, BulkEntry);
    type IntoIter = hash_map::IntoIter<String, BulkEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a BulkResponses {
    type Item = (&'a String, &'a BulkEntry);
    type IntoIter = hash_map::Iter<'a, String, BulkEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
