//! Scan orchestration
//!
//! `ScanOrchestrator` runs one ordered pass over the phonebook and the RRAS
//! role. `Scanner` owns the last completed result list and runs the
//! orchestrator on a blocking worker:
//!
//! 1. At most one scan is in flight; a second `start_scan` is refused
//! 2. Records stream to the observer as they are built
//! 3. `snapshot()` only ever returns a complete list. The new list replaces
//!    the previous one in a single swap when the scan finishes

use crate::audit;
use crate::config::RrasConfig;
use crate::export::{export_csv, ExportError};
use crate::platform::HostPlatform;
use crate::ras::{Listing, RasEntryEnumerator};
use crate::record::InspectionRecord;
use crate::rras::{server_role_record, RrasProbe};
use crate::status_log::StatusLog;
use parking_lot::RwLock;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("A scan is already in progress")]
    AlreadyRunning,
    #[error("No async runtime available to run the scan")]
    NoRuntime,
    #[error("Scan worker failed: {0}")]
    Worker(String),
}

/// Receives scan progress. All methods default to no-ops.
pub trait ScanObserver: Send + Sync {
    fn on_status(&self, _message: &str) {}
    fn on_record(&self, _record: &InspectionRecord) {}
    /// Raised once the new results are visible through `Scanner::snapshot`
    fn on_complete(&self, _summary: &ScanSummary) {}
}

pub struct NullObserver;

impl ScanObserver for NullObserver {}

/// How phonebook enumeration ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumerationOutcome {
    Entries(usize),
    NoEntries,
    NoPhonebook,
    /// Listing failed; carries the RAS status code when the platform reported one
    Failed(Option<u32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub records: usize,
    pub enumeration: EnumerationOutcome,
    pub server_role: bool,
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scan complete. {} configuration(s) found.", self.records)
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub records: Vec<InspectionRecord>,
    pub summary: ScanSummary,
}

pub struct ScanOrchestrator {
    platform: HostPlatform,
    rras: RrasConfig,
    log: StatusLog,
}

impl ScanOrchestrator {
    pub fn new(platform: HostPlatform, rras: RrasConfig, log: StatusLog) -> Self {
        Self {
            platform,
            rras,
            log,
        }
    }

    /// Run a full scan. Results always start from empty.
    pub fn run(&self, observer: &dyn ScanObserver) -> ScanReport {
        let mut records = Vec::new();

        if let Ok(host) = hostname::get() {
            debug!("Scanning host {}", host.to_string_lossy());
        }
        self.status(observer, "Starting scan...");

        let enumeration = self.scan_phonebook(observer, &mut records);
        let server_role = self.scan_server_role(observer, &mut records);

        let summary = ScanSummary {
            records: records.len(),
            enumeration,
            server_role,
        };
        self.status(observer, &summary.to_string());

        ScanReport { records, summary }
    }

    fn scan_phonebook(
        &self,
        observer: &dyn ScanObserver,
        records: &mut Vec<InspectionRecord>,
    ) -> EnumerationOutcome {
        self.status(observer, "Enumerating RAS connections...");
        let enumerator = RasEntryEnumerator::new(self.platform.phonebook.as_ref());

        let names = match enumerator.list() {
            Ok(Listing::Entries(names)) if names.is_empty() => {
                self.status(observer, "No RAS connection configured");
                return EnumerationOutcome::NoEntries;
            }
            Ok(Listing::Entries(names)) => names,
            Ok(Listing::NoPhonebook) => {
                self.status(observer, "No RAS connection found (phonebook not accessible)");
                return EnumerationOutcome::NoPhonebook;
            }
            Err(e) => {
                self.status(observer, &format!("Error: {}", e));
                return EnumerationOutcome::Failed(e.status());
            }
        };

        for name in &names {
            let entry = enumerator.fetch(name);
            let record = match &entry.properties {
                Ok(props) => audit::inspect_entry(&entry.name, props),
                Err(_) => audit::lookup_failed(&entry.name),
            };
            self.emit(observer, records, record);
        }

        EnumerationOutcome::Entries(names.len())
    }

    fn scan_server_role(
        &self,
        observer: &dyn ScanObserver,
        records: &mut Vec<InspectionRecord>,
    ) -> bool {
        let probe = RrasProbe::new(
            &self.rras,
            self.platform.registry.as_ref(),
            self.platform.services.as_ref(),
        );
        if !probe.is_installed() {
            debug!("{} not present, skipping server role", self.rras.registry_key);
            return false;
        }

        self.status(observer, "Checking RRAS configuration...");
        let record = server_role_record(probe.run_state(), probe.router_configured());
        self.emit(observer, records, record);
        true
    }

    fn emit(
        &self,
        observer: &dyn ScanObserver,
        records: &mut Vec<InspectionRecord>,
        record: InspectionRecord,
    ) {
        debug!("{} -> {}: {}", record.name, record.vpn_type, record.notes);
        observer.on_record(&record);
        records.push(record);
    }

    fn status(&self, observer: &dyn ScanObserver, message: &str) {
        self.log.record(message);
        observer.on_status(message);
    }
}

/// Clears the in-flight flag when the worker finishes or unwinds
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Completion signal of a running scan
pub struct ScanHandle {
    task: JoinHandle<ScanSummary>,
}

impl ScanHandle {
    pub async fn wait(self) -> Result<ScanSummary, ScanError> {
        self.task
            .await
            .map_err(|e| ScanError::Worker(e.to_string()))
    }
}

/// Owner of the last completed result list
pub struct Scanner {
    orchestrator: Arc<ScanOrchestrator>,
    results: Arc<RwLock<Arc<[InspectionRecord]>>>,
    in_flight: Arc<AtomicBool>,
}

impl Scanner {
    pub fn new(orchestrator: ScanOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            results: Arc::new(RwLock::new(Arc::from(Vec::<InspectionRecord>::new()))),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The last completed result list
    pub fn snapshot(&self) -> Arc<[InspectionRecord]> {
        self.results.read().clone()
    }

    /// Start a scan on a blocking worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_scan(&self, observer: Arc<dyn ScanObserver>) -> Result<ScanHandle, ScanError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ScanError::NoRuntime)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ScanError::AlreadyRunning);
        }
        let guard = InFlightGuard(self.in_flight.clone());

        let orchestrator = self.orchestrator.clone();
        let results = self.results.clone();
        let task = runtime.spawn_blocking(move || {
            let report = orchestrator.run(observer.as_ref());
            *results.write() = Arc::from(report.records);
            drop(guard);

            info!("{}", report.summary);
            observer.on_complete(&report.summary);
            report.summary
        });

        Ok(ScanHandle { task })
    }

    /// Export the last completed result list
    pub fn export(&self, path: &Path) -> Result<usize, ExportError> {
        let records = self.snapshot();
        match export_csv(&records, path) {
            Ok(()) => {
                self.orchestrator
                    .log
                    .record(&format!("CSV export succeeded: {}", path.display()));
                Ok(records.len())
            }
            Err(e) => {
                self.orchestrator.log.record(&format!("Error: {}", e));
                Err(e)
            }
        }
    }
}
