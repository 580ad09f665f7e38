//! VpnEndpointInspector - audit of local VPN client entries and the RRAS role
//!
//! Enumerates the RAS phonebook and the Routing and Remote Access Service
//! server role on a Windows host, and flags weak authentication protocols,
//! disabled encryption and legacy tunnel types.
//!
//! # Architecture
//!
//! - `platform`: phonebook, registry and service manager access (Windows)
//! - `ras`: phonebook enumeration
//! - `audit`: classification and risk notes
//! - `rras`: server role record
//! - `scan`: orchestration and the double-buffered result list
//! - `export`: CSV export
//! - `status_log`: timestamped status log file
//! - `config`: configuration file handling (TOML)

pub mod audit;
pub mod config;
pub mod export;
pub mod platform;
pub mod ras;
pub mod record;
pub mod rras;
pub mod scan;
pub mod status_log;

pub use config::Config;
pub use record::InspectionRecord;
pub use scan::{ScanObserver, ScanOrchestrator, ScanSummary, Scanner};
pub use status_log::StatusLog;
