//! WiFi station-mode adapter.
//!
//! Brings the station link up at boot and keeps it up afterwards.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: only credentials and the reconnect policy,
//!   which are pure and tested on host.
//!
//! ## Reconnection policy
//!
//! After a failed attempt or a dropped link the adapter waits an
//! exponential backoff (2 s → 4 s → 8 s … capped at 60 s) before retrying.
//! A successful connection resets the backoff.

use core::fmt;
use log::{info, warn};

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// Validated station credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds
            .ssid
            .push_str(ssid)
            .map_err(|_| ConnectivityError::InvalidSsid)?;
        creds
            .password
            .push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok(creds)
    }

    /// Credentials baked in at build time via `THERMOWATCH_WIFI_SSID` and
    /// `THERMOWATCH_WIFI_PASSWORD`.  An empty SSID counts as unset.
    pub fn from_build_env() -> Result<Self, ConnectivityError> {
        let ssid = option_env!("THERMOWATCH_WIFI_SSID")
            .filter(|s| !s.is_empty())
            .ok_or(ConnectivityError::NoCredentials)?;
        Self::new(ssid, option_env!("THERMOWATCH_WIFI_PASSWORD").unwrap_or(""))
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Reconnect policy
// ───────────────────────────────────────────────────────────────

const INITIAL_BACKOFF_MS: u64 = 2_000;
const MAX_BACKOFF_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Connected,
    Reconnecting { attempt: u32, next_at_ms: u64 },
}

/// Pure reconnect state machine; the platform layer acts on its answers.
#[derive(Debug)]
pub struct ReconnectPolicy {
    state: WifiState,
    backoff_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconnectPolicy {
    /// Starts in `Connected`; the boot path only builds one after the
    /// first successful association.
    pub fn new() -> Self {
        Self {
            state: WifiState::Connected,
            backoff_ms: INITIAL_BACKOFF_MS,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn backoff_ms(&self) -> u64 {
        self.backoff_ms
    }

    /// Feed the observed link state.  Returns `true` when the caller should
    /// start a connection attempt now.
    pub fn poll(&mut self, now_ms: u64, link_up: bool) -> bool {
        match (self.state, link_up) {
            (WifiState::Connected, true) => false,
            (WifiState::Connected, false) => {
                warn!("WiFi: connection lost, entering reconnect");
                self.backoff_ms = INITIAL_BACKOFF_MS;
                self.schedule_attempt(1, now_ms);
                true
            }
            (WifiState::Reconnecting { attempt, .. }, true) => {
                info!("WiFi: reconnected after {} attempt(s)", attempt);
                self.state = WifiState::Connected;
                self.backoff_ms = INITIAL_BACKOFF_MS;
                false
            }
            (WifiState::Reconnecting { attempt, next_at_ms }, false) => {
                if now_ms < next_at_ms {
                    return false;
                }
                info!("WiFi: reconnect attempt {}", attempt + 1);
                self.schedule_attempt(attempt + 1, now_ms);
                true
            }
        }
    }

    fn schedule_attempt(&mut self, attempt: u32, now_ms: u64) {
        self.state = WifiState::Reconnecting {
            attempt,
            next_at_ms: now_ms + self.backoff_ms,
        };
        self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
    }
}

/// Backoff before boot attempt `attempt` (0-based).
pub fn boot_backoff_ms(attempt: u32) -> u64 {
    INITIAL_BACKOFF_MS
        .saturating_mul(1u64 << attempt.min(16))
        .min(MAX_BACKOFF_MS)
}

/// Association attempts made at boot before giving up.
pub const BOOT_CONNECT_ATTEMPTS: u32 = 8;

// ───────────────────────────────────────────────────────────────
// WiFi link
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::WifiLink;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{boot_backoff_ms, ConnectivityError, ReconnectPolicy, WifiCredentials, BOOT_CONNECT_ATTEMPTS};

    pub struct WifiLink {
        wifi: BlockingWifi<EspWifi<'static>>,
        policy: ReconnectPolicy,
    }

    impl WifiLink {
        /// Configure the station and block until associated with an IP,
        /// retrying with backoff.
        pub fn connect(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: Option<EspDefaultNvsPartition>,
            creds: &WifiCredentials,
        ) -> Result<Self, ConnectivityError> {
            let esp_wifi =
                EspWifi::new(modem, sysloop.clone(), nvs).map_err(|_| ConnectivityError::ConnectionFailed)?;
            let mut wifi =
                BlockingWifi::wrap(esp_wifi, sysloop).map_err(|_| ConnectivityError::ConnectionFailed)?;

            let auth_method = if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            wifi.set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: creds.ssid().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
                password: creds
                    .password()
                    .try_into()
                    .map_err(|_| ConnectivityError::InvalidPassword)?,
                auth_method,
                ..Default::default()
            }))
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
            wifi.start().map_err(|_| ConnectivityError::ConnectionFailed)?;
            info!("WiFi: connecting to '{}'", creds.ssid());

            for attempt in 0..BOOT_CONNECT_ATTEMPTS {
                match wifi.connect().and_then(|()| wifi.wait_netif_up()) {
                    Ok(()) => {
                        if let Ok(ip) = wifi.wifi().sta_netif().get_ip_info() {
                            info!("WiFi: connected, IP {}", ip.ip);
                        }
                        return Ok(Self {
                            wifi,
                            policy: ReconnectPolicy::new(),
                        });
                    }
                    Err(e) => {
                        let wait = boot_backoff_ms(attempt);
                        warn!(
                            "WiFi: attempt {}/{} failed ({}), retrying in {} ms",
                            attempt + 1,
                            BOOT_CONNECT_ATTEMPTS,
                            e,
                            wait
                        );
                        let _ = wifi.disconnect();
                        std::thread::sleep(std::time::Duration::from_millis(wait));
                    }
                }
            }
            Err(ConnectivityError::ConnectionFailed)
        }

        /// Non-blocking supervision; call once per loop iteration.
        pub fn poll(&mut self, now_ms: u64) {
            let up = self.wifi.is_connected().unwrap_or(false);
            if self.policy.poll(now_ms, up) {
                // The driver's own connect is asynchronous; the next poll
                // observes the outcome.
                if let Err(e) = self.wifi.wifi_mut().connect() {
                    warn!("WiFi: reconnect request failed ({})", e);
                }
            }
        }

        pub fn is_connected(&self) -> bool {
            self.wifi.is_connected().unwrap_or(false)
        }
    }
}
