//! Per-operation GetBulk parameters.

use crate::error::{Error, Result};
use crate::version::Version;

/// Parameters fixed for the lifetime of one bulk operation.
///
/// # Example
///
/// ```rust
/// use snmp_bulk::BulkOptions;
///
/// // sysUpTime as a non-repeater, then up to 25 rows per table column.
/// let options = BulkOptions::default().non_repeaters(1).max_repetitions(25);
/// assert_eq!(options.max_repetitions, 25);
/// assert!(!options.return_raw);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOptions {
    /// SNMP version (default: V2c)
    pub version: Version,
    /// Keep values exactly as returned instead of normalizing them (default: false)
    pub return_raw: bool,
    /// Leading OIDs fetched once per round (default: 0)
    pub non_repeaters: u32,
    /// Bindings the agent may return per repeating OID (default: 10)
    pub max_repetitions: u32,
    /// Error-bearing rounds tolerated before giving up (default: None, the OID count)
    pub error_retries: Option<u32>,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            return_raw: false,
            non_repeaters: 0,
            max_repetitions: 10,
            error_retries: None,
        }
    }
}

impl BulkOptions {
    /// Set the SNMP version.
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Keep raw values in the result map.
    pub fn return_raw(mut self, raw: bool) -> Self {
        self.return_raw = raw;
        self
    }

    /// Set the non-repeater count.
    pub fn non_repeaters(mut self, count: u32) -> Self {
        self.non_repeaters = count;
        self
    }

    /// Set the max-repetitions count.
    pub fn max_repetitions(mut self, count: u32) -> Self {
        self.max_repetitions = count;
        self
    }

    /// Override the shared error budget.
    pub fn error_retries(mut self, budget: u32) -> Self {
        self.error_retries = Some(budget);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self.version {
            Version::V1 => {
                return Err(Error::config("GETBULK is not available in SNMPv1"));
            }
            Version::V3 => {
                return Err(Error::config(
                    "SNMPv3 bulk requests need USM, which is not supported",
                ));
            }
            Version::V2c => {}
        }

        if self.max_repetitions == 0 {
            return Err(Error::config("max_repetitions must be at least 1"));
        }
        if i32::try_from(self.max_repetitions).is_err() {
            return Err(Error::config("max_repetitions exceeds INTEGER range"));
        }
        if i32::try_from(self.non_repeaters).is_err() {
            return Err(Error::config("non_repeaters exceeds INTEGER range"));
        }

        Ok(())
    }
}
