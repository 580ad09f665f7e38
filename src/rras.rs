//! RRAS server role detection

use crate::audit::VpnType;
use crate::config::RrasConfig;
use crate::platform::{RegistryReader, ServiceState, ServiceStatusChecker};
use crate::record::InspectionRecord;
use tracing::{debug, warn};

pub const RECORD_NAME: &str = "[RRAS Service]";
const STANDARD_PORTS: &str = "Standard ports: PPTP(1723), L2TP(1701), SSTP(443), IKEv2(500/4500).";

/// Run state shown in the server-role record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
    /// The SCM could not be queried
    Unknown,
}

impl RunState {
    fn sentence(self) -> &'static str {
        match self {
            RunState::Running => "RRAS service running.",
            RunState::Stopped => "RRAS service stopped.",
            RunState::Unknown => "RRAS service state unknown.",
        }
    }
}

pub struct RrasProbe<'a> {
    config: &'a RrasConfig,
    registry: &'a dyn RegistryReader,
    services: &'a dyn ServiceStatusChecker,
}

impl<'a> RrasProbe<'a> {
    pub fn new(
        config: &'a RrasConfig,
        registry: &'a dyn RegistryReader,
        services: &'a dyn ServiceStatusChecker,
    ) -> Self {
        Self {
            config,
            registry,
            services,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.registry.key_exists(&self.config.registry_key)
    }

    pub fn run_state(&self) -> RunState {
        match self.services.service_state(&self.config.service_name) {
            Ok(ServiceState::Running) => RunState::Running,
            Ok(state) => {
                debug!("{} state: {:?}", self.config.service_name, state);
                RunState::Stopped
            }
            Err(e) => {
                warn!("{}", e);
                RunState::Unknown
            }
        }
    }

    /// Whether a non-zero router type is configured
    pub fn router_configured(&self) -> bool {
        match self
            .registry
            .read_dword(&self.config.parameters_key, &self.config.router_value)
        {
            Ok(value) => value > 0,
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }

    /// The server-role record, or `None` when RRAS is not installed
    pub fn inspect(&self) -> Option<InspectionRecord> {
        if !self.is_installed() {
            debug!("{} not present, skipping server role", self.config.registry_key);
            return None;
        }
        Some(server_role_record(self.run_state(), self.router_configured()))
    }
}

pub fn server_role_record(state: RunState, router_configured: bool) -> InspectionRecord {
    let router = if router_configured {
        "Router configured."
    } else {
        "No router role configured."
    };

    InspectionRecord {
        name: RECORD_NAME.to_string(),
        vpn_type: VpnType::ServerRole,
        server: "localhost".to_string(),
        port: "Multiple".to_string(),
        auth_method: "Server configuration".to_string(),
        notes: format!("{} {} {}", state.sentence(), STANDARD_PORTS, router),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::{FakeRegistry, FakeServices};

    fn registry(installed: bool, router: Option<u32>) -> FakeRegistry {
        let config = RrasConfig::default();
        let mut reg = FakeRegistry::default();
        if installed {
            reg.keys.push(config.registry_key.clone());
        }
        if let Some(value) = router {
            reg.dwords
                .insert((config.parameters_key, config.router_value), value);
        }
        reg
    }

    #[test]
    fn test_not_installed_produces_nothing() {
        let config = RrasConfig::default();
        let reg = registry(false, Some(1));
        let svc = FakeServices(Some(ServiceState::Running));
        assert!(RrasProbe::new(&config, &reg, &svc).inspect().is_none());
    }

    #[test]
    fn test_stopped_without_router() {
        let config = RrasConfig::default();
        let reg = registry(true, None);
        let svc = FakeServices(Some(ServiceState::Stopped));

        let record = RrasProbe::new(&config, &reg, &svc).inspect().unwrap();
        assert_eq!(record.name, "[RRAS Service]");
        assert_eq!(record.vpn_type.to_string(), "RRAS Server");
        assert_eq!(record.server, "localhost");
        assert!(record.notes.starts_with("RRAS service stopped."));
        assert!(record.notes.ends_with("No router role configured."));
    }

    #[test]
    fn test_running_router() {
        let config = RrasConfig::default();
        let reg = registry(true, Some(1));
        let svc = FakeServices(Some(ServiceState::Running));

        let record = RrasProbe::new(&config, &reg, &svc).inspect().unwrap();
        assert_eq!(
            record.notes,
            "RRAS service running. Standard ports: PPTP(1723), L2TP(1701), SSTP(443), \
             IKEv2(500/4500). Router configured."
        );
    }

    #[test]
    fn test_zero_router_type_is_unconfigured() {
        let config = RrasConfig::default();
        let reg = registry(true, Some(0));
        let svc = FakeServices(Some(ServiceState::Running));
        assert!(!RrasProbe::new(&config, &reg, &svc).router_configured());
    }

    #[test]
    fn test_service_query_failure_degrades_to_unknown() {
        let config = RrasConfig::default();
        let reg = registry(true, None);
        let svc = FakeServices(None);

        let probe = RrasProbe::new(&config, &reg, &svc);
        assert_eq!(probe.run_state(), RunState::Unknown);
        assert!(probe
            .inspect()
            .unwrap()
            .notes
            .starts_with("RRAS service state unknown."));
    }

    #[test]
    fn test_pending_state_reported_as_stopped() {
        let config = RrasConfig::default();
        let reg = registry(true, None);
        // SERVICE_START_PENDING
        let svc = FakeServices(Some(ServiceState::Other(2)));
        assert_eq!(
            RrasProbe::new(&config, &reg, &svc).run_state(),
            RunState::Stopped
        );
    }
}
