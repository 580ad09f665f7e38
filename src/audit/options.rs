//! Phonebook entry option flags

// RASEO_* values from ras.h
const RASEO_REQUIRE_ENCRYPTED_PW: u32 = 0x0000_0400;
const RASEO_REQUIRE_DATA_ENCRYPTION: u32 = 0x0000_1000;
const RASEO_REQUIRE_EAP: u32 = 0x0002_0000;
const RASEO_REQUIRE_PAP: u32 = 0x0004_0000;
const RASEO_REQUIRE_CHAP: u32 = 0x0800_0000;
const RASEO_REQUIRE_MS_CHAP: u32 = 0x1000_0000;
const RASEO_REQUIRE_MS_CHAP2: u32 = 0x2000_0000;

/// The subset of `dwfOptions` the audit looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryOptions {
    pub require_eap: bool,
    pub require_pap: bool,
    pub require_chap: bool,
    pub require_ms_chap: bool,
    pub require_ms_chap_v2: bool,
    pub require_encrypted_password: bool,
    pub require_data_encryption: bool,
}

impl EntryOptions {
    pub fn from_bits(bits: u32) -> Self {
        let set = |flag: u32| bits & flag != 0;
        Self {
            require_eap: set(RASEO_REQUIRE_EAP),
            require_pap: set(RASEO_REQUIRE_PAP),
            require_chap: set(RASEO_REQUIRE_CHAP),
            require_ms_chap: set(RASEO_REQUIRE_MS_CHAP),
            require_ms_chap_v2: set(RASEO_REQUIRE_MS_CHAP2),
            require_encrypted_password: set(RASEO_REQUIRE_ENCRYPTED_PW),
            require_data_encryption: set(RASEO_REQUIRE_DATA_ENCRYPTION),
        }
    }

    pub fn to_bits(self) -> u32 {
        [
            (self.require_eap, RASEO_REQUIRE_EAP),
            (self.require_pap, RASEO_REQUIRE_PAP),
            (self.require_chap, RASEO_REQUIRE_CHAP),
            (self.require_ms_chap, RASEO_REQUIRE_MS_CHAP),
            (self.require_ms_chap_v2, RASEO_REQUIRE_MS_CHAP2),
            (self.require_encrypted_password, RASEO_REQUIRE_ENCRYPTED_PW),
            (self.require_data_encryption, RASEO_REQUIRE_DATA_ENCRYPTION),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .fold(0, |acc, (_, flag)| acc | flag)
    }
}
