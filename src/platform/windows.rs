//! Windows implementation over rasapi32, advapi32 registry and the SCM

use super::{
    two_call_enumerate, wide_to_string, EntryProperties, Phonebook, PlatformError,
    RegistryReader, ServiceState, ServiceStatusChecker, ERROR_CANNOT_OPEN_PHONEBOOK,
};
use tracing::debug;
use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::NetworkManagement::Rras::{
    RasEnumEntriesW, RasGetEntryPropertiesW, RASENTRYNAMEW, RASENTRYW,
};
use windows::Win32::System::Registry::{
    RegCloseKey, RegOpenKeyExW, RegQueryValueExW, HKEY, HKEY_LOCAL_MACHINE, KEY_READ,
    REG_DWORD, REG_VALUE_TYPE,
};
use windows::Win32::System::Services::{
    CloseServiceHandle, OpenSCManagerW, OpenServiceW, QueryServiceStatus, SC_HANDLE,
    SC_MANAGER_CONNECT, SERVICE_QUERY_STATUS, SERVICE_RUNNING, SERVICE_STATUS, SERVICE_STOPPED,
};

pub struct RasPhonebook;

impl RasPhonebook {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RasPhonebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Phonebook for RasPhonebook {
    fn entry_names(&self) -> Result<Vec<String>, PlatformError> {
        let mut count = 0u32;
        let entries = two_call_enumerate::<RASENTRYNAMEW, _, _>(
            |buf, cb| unsafe {
                let ptr = buf.map(|b| b.as_mut_ptr());
                RasEnumEntriesW(PCWSTR::null(), PCWSTR::null(), ptr, cb, &mut count)
            },
            |buf| buf[0].dwSize = std::mem::size_of::<RASENTRYNAMEW>() as u32,
        )
        .map_err(|status| match status {
            ERROR_CANNOT_OPEN_PHONEBOOK => PlatformError::NoPhonebook,
            other => PlatformError::Ras(other),
        })?;

        debug!("RasEnumEntriesW returned {} entries", count);
        Ok(entries
            .iter()
            .take(count as usize)
            .map(|e| wide_to_string(&e.szEntryName))
            .collect())
    }

    fn entry_properties(&self, name: &str) -> Result<EntryProperties, PlatformError> {
        let name_h = HSTRING::from(name);
        let entry = two_call_enumerate::<RASENTRYW, _, _>(
            |buf, cb| unsafe {
                let ptr = buf.map(|b| b.as_mut_ptr());
                RasGetEntryPropertiesW(
                    PCWSTR::null(),
                    PCWSTR::from_raw(name_h.as_ptr()),
                    ptr,
                    cb,
                    None,
                    None,
                )
            },
            |buf| buf[0].dwSize = std::mem::size_of::<RASENTRYW>() as u32,
        )
        .map_err(PlatformError::Ras)?;

        let first = entry.first().ok_or(PlatformError::Ras(0))?;
        Ok(EntryProperties {
            device_type: wide_to_string(&first.szDeviceType),
            // For VPN entries the "phone number" holds the server address
            server: wide_to_string(&first.szLocalPhoneNumber),
            options: first.dwfOptions,
        })
    }
}

/// Open registry key, closed on drop
struct RegKey(HKEY);

impl RegKey {
    fn open(path: &str) -> Option<Self> {
        let path_h = HSTRING::from(path);
        let mut hkey = HKEY::default();
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_LOCAL_MACHINE,
                PCWSTR::from_raw(path_h.as_ptr()),
                0,
                KEY_READ,
                &mut hkey,
            )
        };
        (status == ERROR_SUCCESS).then_some(Self(hkey))
    }

    fn query(&self, value: &str, data: &mut [u8]) -> Option<(REG_VALUE_TYPE, usize)> {
        let value_h = HSTRING::from(value);
        let mut kind = REG_VALUE_TYPE::default();
        let mut size = data.len() as u32;
        let status = unsafe {
            RegQueryValueExW(
                self.0,
                PCWSTR::from_raw(value_h.as_ptr()),
                None,
                Some(&mut kind),
                Some(data.as_mut_ptr()),
                Some(&mut size),
            )
        };
        (status == ERROR_SUCCESS).then_some((kind, size as usize))
    }
}

impl Drop for RegKey {
    fn drop(&mut self) {
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

pub struct WindowsRegistry;

impl WindowsRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryReader for WindowsRegistry {
    fn key_exists(&self, key: &str) -> bool {
        RegKey::open(key).is_some()
    }

    fn read_dword(&self, key: &str, value: &str) -> Result<u32, PlatformError> {
        let unreadable = || PlatformError::ValueUnreadable {
            key: key.to_string(),
            value: value.to_string(),
        };
        let hkey = RegKey::open(key).ok_or_else(|| PlatformError::KeyNotFound(key.to_string()))?;

        let mut data = [0u8; 4];
        match hkey.query(value, &mut data) {
            Some((kind, 4)) if kind == REG_DWORD => Ok(u32::from_le_bytes(data)),
            _ => Err(unreadable()),
        }
    }
}

/// SCM or service handle, closed on drop
struct ServiceHandle(SC_HANDLE);

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseServiceHandle(self.0);
        }
    }
}

pub struct ScmServiceChecker;

impl ScmServiceChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScmServiceChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceStatusChecker for ScmServiceChecker {
    fn service_state(&self, name: &str) -> Result<ServiceState, PlatformError> {
        let failed = |e: windows::core::Error| PlatformError::ServiceQuery {
            name: name.to_string(),
            message: e.to_string(),
        };

        let scm = unsafe { OpenSCManagerW(PCWSTR::null(), PCWSTR::null(), SC_MANAGER_CONNECT) }
            .map(ServiceHandle)
            .map_err(failed)?;

        let name_h = HSTRING::from(name);
        let service = unsafe {
            OpenServiceW(scm.0, PCWSTR::from_raw(name_h.as_ptr()), SERVICE_QUERY_STATUS)
        }
        .map(ServiceHandle)
        .map_err(failed)?;

        let mut status = SERVICE_STATUS::default();
        unsafe { QueryServiceStatus(service.0, &mut status) }.map_err(failed)?;

        Ok(match status.dwCurrentState {
            SERVICE_RUNNING => ServiceState::Running,
            SERVICE_STOPPED => ServiceState::Stopped,
            other => ServiceState::Other(other.0),
        })
    }
}
