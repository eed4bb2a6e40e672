//! Device identity derived from the ESP32 factory MAC address.
//!
//! Produces a stable MQTT client ID of the form `thermowatch-xxyyzz`
//! (last 3 bytes of the 6-byte MAC, lowercase hex), so several monitors can
//! share one broker without kicking each other off.

use core::fmt::Write;

/// Fixed-size client ID string.
pub type ClientIdString = heapless::String<24>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: the buffer is exactly the 6 bytes the call writes.
    unsafe {
        esp_idf_sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// MQTT client ID from the last 3 MAC bytes.
pub fn client_id(mac: &MacAddress) -> ClientIdString {
    let mut id = ClientIdString::new();
    // 18 chars always fit.
    let _ = write!(id, "thermowatch-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    id
}
