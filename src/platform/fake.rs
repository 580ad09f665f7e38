//! In-memory platform used by tests

use super::{
    EntryProperties, HostPlatform, Phonebook, PlatformError, RegistryReader, ServiceState,
    ServiceStatusChecker,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct FakePhonebook {
    pub missing: bool,
    pub failure: Option<u32>,
    pub entries: Vec<(String, Option<EntryProperties>)>,
}

impl FakePhonebook {
    pub fn with_entry(mut self, name: &str, device_type: &str, server: &str, options: u32) -> Self {
        self.entries.push((
            name.to_string(),
            Some(EntryProperties {
                device_type: device_type.to_string(),
                server: server.to_string(),
                options,
            }),
        ));
        self
    }

    pub fn with_broken_entry(mut self, name: &str) -> Self {
        self.entries.push((name.to_string(), None));
        self
    }
}

impl Phonebook for FakePhonebook {
    fn entry_names(&self) -> Result<Vec<String>, PlatformError> {
        if self.missing {
            return Err(PlatformError::NoPhonebook);
        }
        if let Some(code) = self.failure {
            return Err(PlatformError::Ras(code));
        }
        Ok(self.entries.iter().map(|(n, _)| n.clone()).collect())
    }

    fn entry_properties(&self, name: &str) -> Result<EntryProperties, PlatformError> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, p)| p.clone())
            .ok_or(PlatformError::Ras(623))
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    pub keys: Vec<String>,
    pub dwords: HashMap<(String, String), u32>,
    pub key_lookups: AtomicUsize,
}

impl RegistryReader for FakeRegistry {
    fn key_exists(&self, key: &str) -> bool {
        self.key_lookups.fetch_add(1, Ordering::Relaxed);
        self.keys.iter().any(|k| k == key)
    }

    fn read_dword(&self, key: &str, value: &str) -> Result<u32, PlatformError> {
        self.dwords
            .get(&(key.to_string(), value.to_string()))
            .copied()
            .ok_or_else(|| PlatformError::ValueUnreadable {
                key: key.to_string(),
                value: value.to_string(),
            })
    }
}

pub struct FakeServices(pub Option<ServiceState>);

impl ServiceStatusChecker for FakeServices {
    fn service_state(&self, name: &str) -> Result<ServiceState, PlatformError> {
        self.0.ok_or_else(|| PlatformError::ServiceQuery {
            name: name.to_string(),
            message: "access denied".to_string(),
        })
    }
}

pub fn platform(
    phonebook: FakePhonebook,
    registry: FakeRegistry,
    service: Option<ServiceState>,
) -> HostPlatform {
    HostPlatform {
        phonebook: Arc::new(phonebook),
        registry: Arc::new(registry),
        services: Arc::new(FakeServices(service)),
    }
}
