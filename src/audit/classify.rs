//! Mapping of RAS device types, ports and auth flags to display labels

use super::options::EntryOptions;
use serde::Serialize;
use std::fmt;

pub const PAP_LABEL: &str = "PAP (weak)";
pub const MS_CHAP_LABEL: &str = "MS-CHAP (weak)";
pub const UNSPECIFIED: &str = "Unspecified";
pub const NOT_AVAILABLE: &str = "N/A";

/// Tunnel type of an inspection record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum VpnType {
    Pptp,
    L2tpIpsec,
    Sstp,
    Ikev2,
    /// The synthetic RRAS server-role record
    ServerRole,
    /// Properties could not be read
    Error,
    /// Unrecognized device type, kept verbatim
    Other(String),
}

impl fmt::Display for VpnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VpnType::Pptp => "PPTP",
            VpnType::L2tpIpsec => "L2TP/IPSec",
            VpnType::Sstp => "SSTP",
            VpnType::Ikev2 => "IKEv2",
            VpnType::ServerRole => "RRAS Server",
            VpnType::Error => "Error",
            VpnType::Other(raw) => raw,
        };
        f.write_str(label)
    }
}

impl From<VpnType> for String {
    fn from(t: VpnType) -> Self {
        t.to_string()
    }
}

/// First match wins, in PPTP, L2TP, SSTP, IKEv2 order
pub fn classify_type(device_type: &str) -> VpnType {
    if device_type.contains("PPTP") {
        VpnType::Pptp
    } else if device_type.contains("L2TP") {
        VpnType::L2tpIpsec
    } else if device_type.contains("SSTP") {
        VpnType::Sstp
    } else if device_type.contains("IKEv2") {
        VpnType::Ikev2
    } else {
        VpnType::Other(device_type.to_string())
    }
}

pub fn default_port(vpn_type: &VpnType) -> &'static str {
    match vpn_type {
        VpnType::Pptp => "1723",
        VpnType::L2tpIpsec => "1701 (+ IPSec 500/4500)",
        VpnType::Sstp => "443",
        VpnType::Ikev2 => "500/4500",
        _ => NOT_AVAILABLE,
    }
}

/// Comma-joined labels for every required auth protocol.
///
/// Order is fixed (EAP, PAP, CHAP, MS-CHAP, MS-CHAPv2) regardless of bit value.
pub fn auth_label(options: &EntryOptions) -> String {
    let labels: Vec<&str> = [
        (options.require_eap, "EAP"),
        (options.require_pap, PAP_LABEL),
        (options.require_chap, "CHAP"),
        (options.require_ms_chap, MS_CHAP_LABEL),
        (options.require_ms_chap_v2, "MS-CHAPv2"),
    ]
    .into_iter()
    .filter_map(|(on, label)| on.then_some(label))
    .collect();

    if labels.is_empty() {
        UNSPECIFIED.to_string()
    } else {
        labels.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_device_types() {
        assert_eq!(classify_type("WAN Miniport (PPTP)"), VpnType::Pptp);
        assert_eq!(classify_type("WAN Miniport (L2TP)"), VpnType::L2tpIpsec);
        assert_eq!(classify_type("WAN Miniport (SSTP)"), VpnType::Sstp);
        assert_eq!(classify_type("WAN Miniport (IKEv2)"), VpnType::Ikev2);
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(classify_type("SSTP over PPTP"), VpnType::Pptp);
        assert_eq!(classify_type("IKEv2/L2TP"), VpnType::L2tpIpsec);
    }

    #[test]
    fn test_classify_unknown_passthrough() {
        for raw in ["vpn", "", "modem", "pptp", "ikev2"] {
            let t = classify_type(raw);
            assert_eq!(t, VpnType::Other(raw.to_string()));
            assert_eq!(t.to_string(), raw);
            assert_eq!(classify_type(&t.to_string()), t);
        }
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(default_port(&VpnType::Pptp), "1723");
        assert_eq!(default_port(&VpnType::L2tpIpsec), "1701 (+ IPSec 500/4500)");
        assert_eq!(default_port(&VpnType::Sstp), "443");
        assert_eq!(default_port(&VpnType::Ikev2), "500/4500");
        assert_eq!(default_port(&VpnType::Other("modem".into())), "N/A");
        assert_eq!(default_port(&VpnType::Error), "N/A");
    }

    #[test]
    fn test_default_port_stable() {
        let s = "WAN Miniport (IKEv2)";
        assert_eq!(
            default_port(&classify_type(s)),
            default_port(&classify_type(s))
        );
    }

    #[test]
    fn test_auth_label_unspecified() {
        assert_eq!(auth_label(&EntryOptions::default()), "Unspecified");
    }

    #[test]
    fn test_auth_label_single() {
        let opts = EntryOptions {
            require_pap: true,
            ..Default::default()
        };
        assert_eq!(auth_label(&opts), "PAP (weak)");
    }

    #[test]
    fn test_auth_label_all_in_test_order() {
        let opts = EntryOptions {
            require_ms_chap_v2: true,
            require_ms_chap: true,
            require_chap: true,
            require_pap: true,
            require_eap: true,
            ..Default::default()
        };
        assert_eq!(
            auth_label(&opts),
            "EAP, PAP (weak), CHAP, MS-CHAP (weak), MS-CHAPv2"
        );
    }

    #[test]
    fn test_auth_label_pap_always_weak() {
        for bits in 0u32..32 {
            let opts = EntryOptions {
                require_eap: bits & 1 != 0,
                require_pap: true,
                require_chap: bits & 2 != 0,
                require_ms_chap: bits & 4 != 0,
                require_ms_chap_v2: bits & 8 != 0,
                require_encrypted_password: bits & 16 != 0,
                require_data_encryption: false,
            };
            let label = auth_label(&opts);
            assert!(label.contains(PAP_LABEL));
            assert_eq!(label, auth_label(&opts));
        }
    }

    #[test]
    fn test_vpn_type_serializes_as_label() {
        let json = serde_json::to_string(&VpnType::L2tpIpsec).unwrap();
        assert_eq!(json, "\"L2TP/IPSec\"");
    }
}
