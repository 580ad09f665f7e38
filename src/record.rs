//! One row of scan output

use crate::audit::VpnType;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    pub name: String,
    pub vpn_type: VpnType,
    pub server: String,
    pub port: String,
    pub auth_method: String,
    pub notes: String,
}

impl InspectionRecord {
    /// Fields in export column order
    pub fn fields(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.vpn_type.to_string(),
            self.server.clone(),
            self.port.clone(),
            self.auth_method.clone(),
            self.notes.clone(),
        ]
    }
}
