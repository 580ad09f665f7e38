//! Security notes for a classified entry

use super::classify::{VpnType, MS_CHAP_LABEL, PAP_LABEL};
use super::options::EntryOptions;

pub const PPTP_OBSOLETE: &str = "PPTP is obsolete and vulnerable.";
pub const PAP_CLEARTEXT: &str = "PAP sends passwords in cleartext.";
pub const MS_CHAP_VULNERABLE: &str = "MS-CHAP is vulnerable to attack.";
pub const PASSWORD_NOT_ENCRYPTED: &str = "Password not encrypted.";
pub const DATA_NOT_ENCRYPTED: &str = "Data not encrypted.";
pub const LOOKS_CORRECT: &str = "Configuration appears correct.";

/// Every risk note that applies, in check order
pub fn annotate(vpn_type: &VpnType, auth_label: &str, options: &EntryOptions) -> Vec<&'static str> {
    let mut notes = Vec::new();

    if *vpn_type == VpnType::Pptp {
        notes.push(PPTP_OBSOLETE);
    }
    if auth_label.split(", ").any(|l| l == PAP_LABEL) {
        notes.push(PAP_CLEARTEXT);
    }
    if auth_label.contains(MS_CHAP_LABEL) {
        notes.push(MS_CHAP_VULNERABLE);
    }
    if !options.require_encrypted_password {
        notes.push(PASSWORD_NOT_ENCRYPTED);
    }
    if !options.require_data_encryption {
        notes.push(DATA_NOT_ENCRYPTED);
    }

    notes
}

/// Join notes, or the sentinel when there are none
pub fn render_notes(notes: &[&str]) -> String {
    if notes.is_empty() {
        LOOKS_CORRECT.to_string()
    } else {
        notes.join(" ")
    }
}
