//! Platform-specific access to the phonebook, registry and service manager

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;
use thiserror::Error;

/// RAS status: the supplied buffer is too small, the required size was written back
pub const ERROR_BUFFER_TOO_SMALL: u32 = 603;
/// RAS status: the phonebook file does not exist or cannot be opened
pub const ERROR_CANNOT_OPEN_PHONEBOOK: u32 = 621;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Phonebook not accessible")]
    NoPhonebook,
    #[error("RAS call failed with status {0}")]
    Ras(u32),
    #[error("Registry key not found: {0}")]
    KeyNotFound(String),
    #[error("Registry value {value} unreadable under {key}")]
    ValueUnreadable { key: String, value: String },
    #[error("Service query failed for {name}: {message}")]
    ServiceQuery { name: String, message: String },
    #[error("Unsupported platform")]
    UnsupportedPlatform,
}

/// Properties read from a single phonebook entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryProperties {
    pub device_type: String,
    pub server: String,
    pub options: u32,
}

/// Service run state as reported by the Service Control Manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Stopped,
    /// Any other SCM state (start pending, paused, ...)
    Other(u32),
}

/// RAS phonebook access
pub trait Phonebook: Send + Sync {
    /// Names of every configured entry, in phonebook order
    fn entry_names(&self) -> Result<Vec<String>, PlatformError>;
    fn entry_properties(&self, name: &str) -> Result<EntryProperties, PlatformError>;
}

/// Read-only access to HKEY_LOCAL_MACHINE
pub trait RegistryReader: Send + Sync {
    fn key_exists(&self, key: &str) -> bool;
    fn read_dword(&self, key: &str, value: &str) -> Result<u32, PlatformError>;
}

pub trait ServiceStatusChecker: Send + Sync {
    fn service_state(&self, name: &str) -> Result<ServiceState, PlatformError>;
}

/// The set of OS collaborators a scan runs against
#[derive(Clone)]
pub struct HostPlatform {
    pub phonebook: Arc<dyn Phonebook>,
    pub registry: Arc<dyn RegistryReader>,
    pub services: Arc<dyn ServiceStatusChecker>,
}

/// Get the platform implementation for the current host
pub fn get_host_platform() -> Result<HostPlatform, PlatformError> {
    #[cfg(target_os = "windows")]
    {
        Ok(HostPlatform {
            phonebook: Arc::new(windows::RasPhonebook::new()),
            registry: Arc::new(windows::WindowsRegistry::new()),
            services: Arc::new(windows::ScmServiceChecker::new()),
        })
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(PlatformError::UnsupportedPlatform)
    }
}

/// Run a RAS-style call using the size-discovery protocol.
///
/// `call` receives the buffer (or `None` on the sizing pass) and the byte size
/// in/out parameter, and returns the raw status. When the first pass reports
/// `ERROR_BUFFER_TOO_SMALL`, a buffer of exactly the reported size is allocated,
/// `prepare` stamps it (typically `dwSize`), and the call is retried once.
/// The buffer is owned by the returned `Vec` or dropped with the error.
pub fn two_call_enumerate<T, F, P>(mut call: F, prepare: P) -> Result<Vec<T>, u32>
where
    T: Default + Clone,
    F: FnMut(Option<&mut [T]>, &mut u32) -> u32,
    P: FnOnce(&mut [T]),
{
    let mut cb = 0u32;
    let mut status = call(None, &mut cb);
    let mut buffer: Vec<T> = Vec::new();

    if status == ERROR_BUFFER_TOO_SMALL {
        let slots = (cb as usize).div_ceil(std::mem::size_of::<T>()).max(1);
        buffer = vec![T::default(); slots];
        prepare(&mut buffer);
        status = call(Some(&mut buffer), &mut cb);
    }

    if status != 0 {
        return Err(status);
    }
    Ok(buffer)
}

/// Decode a NUL-terminated UTF-16 buffer
pub fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}
