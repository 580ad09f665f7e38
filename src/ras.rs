//! RAS phonebook enumeration
//!
//! Lists the configured entries and fetches each entry's properties. A
//! missing phonebook is a normal "nothing configured" result, and a failed
//! property lookup only affects the entry it belongs to.

use crate::platform::{EntryProperties, Phonebook, PlatformError};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum EnumerationError {
    #[error("RasEnumEntries error: {0}")]
    Status(u32),
    #[error("Phonebook enumeration failed: {0}")]
    Platform(PlatformError),
}

impl EnumerationError {
    /// The RAS status code, if the failure came with one
    pub fn status(&self) -> Option<u32> {
        match self {
            EnumerationError::Status(code) => Some(*code),
            EnumerationError::Platform(_) => None,
        }
    }
}

impl From<PlatformError> for EnumerationError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Ras(code) => EnumerationError::Status(code),
            other => EnumerationError::Platform(other),
        }
    }
}

/// Result of listing the phonebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Entry names in phonebook order (possibly empty)
    Entries(Vec<String>),
    /// No phonebook file exists for this user
    NoPhonebook,
}

/// A listed entry with its property lookup result
#[derive(Debug)]
pub struct RawEntry {
    pub name: String,
    pub properties: Result<EntryProperties, PlatformError>,
}

pub struct RasEntryEnumerator<'a> {
    phonebook: &'a dyn Phonebook,
}

impl<'a> RasEntryEnumerator<'a> {
    pub fn new(phonebook: &'a dyn Phonebook) -> Self {
        Self { phonebook }
    }

    pub fn list(&self) -> Result<Listing, EnumerationError> {
        match self.phonebook.entry_names() {
            Ok(names) => {
                debug!("Phonebook lists {} entries", names.len());
                Ok(Listing::Entries(names))
            }
            Err(PlatformError::NoPhonebook) => Ok(Listing::NoPhonebook),
            Err(e) => Err(e.into()),
        }
    }

    pub fn fetch(&self, name: &str) -> RawEntry {
        let properties = self.phonebook.entry_properties(name);
        if let Err(ref e) = properties {
            warn!("Could not read properties of {}: {}", name, e);
        }
        RawEntry {
            name: name.to_string(),
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::FakePhonebook;

    #[test]
    fn test_missing_phonebook_is_not_an_error() {
        let phonebook = FakePhonebook {
            missing: true,
            ..Default::default()
        };
        let listing = RasEntryEnumerator::new(&phonebook).list().unwrap();
        assert_eq!(listing, Listing::NoPhonebook);
    }

    #[test]
    fn test_empty_phonebook() {
        let phonebook = FakePhonebook::default();
        let listing = RasEntryEnumerator::new(&phonebook).list().unwrap();
        assert_eq!(listing, Listing::Entries(vec![]));
    }

    #[test]
    fn test_failure_carries_status_code() {
        let phonebook = FakePhonebook {
            failure: Some(632),
            ..Default::default()
        };
        let err = RasEntryEnumerator::new(&phonebook).list().unwrap_err();
        assert!(matches!(err, EnumerationError::Status(632)));
        assert_eq!(err.status(), Some(632));
        assert_eq!(err.to_string(), "RasEnumEntries error: 632");
    }

    #[test]
    fn test_fetch_keeps_order_and_isolates_failures() {
        let phonebook = FakePhonebook::default()
            .with_entry("A", "WAN Miniport (SSTP)", "a.example.com", 0)
            .with_broken_entry("B")
            .with_entry("C", "WAN Miniport (PPTP)", "c.example.com", 0);
        let enumerator = RasEntryEnumerator::new(&phonebook);

        let Listing::Entries(names) = enumerator.list().unwrap() else {
            panic!("Expected entries");
        };
        assert_eq!(names, vec!["A", "B", "C"]);

        let fetched: Vec<RawEntry> = names.iter().map(|n| enumerator.fetch(n)).collect();
        assert!(fetched[0].properties.is_ok());
        assert!(fetched[1].properties.is_err());
        assert_eq!(fetched[2].properties.as_ref().unwrap().server, "c.example.com");
    }
}
