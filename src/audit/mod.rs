//! Classification and risk annotation of phonebook entries
//!
//! - `options`: typed view of the RAS option bitmask
//! - `classify`: device type, default port and auth labels
//! - `risk`: security notes

pub mod classify;
pub mod options;
pub mod risk;

pub use classify::VpnType;
pub use options::EntryOptions;

use crate::platform::EntryProperties;
use crate::record::InspectionRecord;
use classify::NOT_AVAILABLE;

pub const LOOKUP_FAILED: &str = "Could not retrieve properties.";

/// Build the record for an entry whose properties were read
pub fn inspect_entry(name: &str, props: &EntryProperties) -> InspectionRecord {
    let vpn_type = classify::classify_type(&props.device_type);
    let options = EntryOptions::from_bits(props.options);
    let auth_method = classify::auth_label(&options);
    let notes = risk::annotate(&vpn_type, &auth_method, &options);

    InspectionRecord {
        name: name.to_string(),
        port: classify::default_port(&vpn_type).to_string(),
        vpn_type,
        server: props.server.clone(),
        auth_method,
        notes: risk::render_notes(&notes),
    }
}

/// Record for an entry whose property lookup failed
pub fn lookup_failed(name: &str) -> InspectionRecord {
    InspectionRecord {
        name: name.to_string(),
        vpn_type: VpnType::Error,
        server: NOT_AVAILABLE.to_string(),
        port: NOT_AVAILABLE.to_string(),
        auth_method: NOT_AVAILABLE.to_string(),
        notes: LOOKUP_FAILED.to_string(),
    }
}
