//! WiFi station-mode adapter.
//!
//! The desk controller is useless off the network, so connection is a
//! blocking, must-succeed step of the boot sequence.  Credentials are baked
//! in at build time (`DESKLIFT_WIFI_SSID` / `DESKLIFT_WIFI_PASS`) and
//! validated before the driver ever sees them.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all other targets**: only the credential types/validation compile,
//!   for host-side tests.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(
                f,
                "no WiFi credentials baked in (set DESKLIFT_WIFI_SSID at build time)"
            ),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(
                f,
                "password invalid (must be 8-64 bytes for WPA2, or empty for open)"
            ),
        }
    }
}

impl std::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

/// Validated station credentials.
#[derive(Debug, Clone)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|()| ConnectivityError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        Ok(Self { ssid: s, password: p })
    }

    /// Credentials injected at build time.
    pub fn from_build_env() -> Result<Self, ConnectivityError> {
        let ssid = option_env!("DESKLIFT_WIFI_SSID").unwrap_or("");
        let password = option_env!("DESKLIFT_WIFI_PASS").unwrap_or("");
        if ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        Self::new(ssid, password)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
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

// ───────────────────────────────────────────────────────────────
// Station bring-up (espidf only)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub mod station {
    use anyhow::Context;
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::info;

    use super::WifiCredentials;

    /// Connect as a station and block until the netif is up.  The returned
    /// handle must stay alive for the process lifetime.
    ///
    /// The default NVS partition is handed to the driver for PHY
    /// calibration data only; the application itself persists nothing.
    pub fn connect(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        creds: &WifiCredentials,
    ) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
        let nvs = EspDefaultNvsPartition::take()?;
        let mut wifi =
            BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;

        let auth_method = if creds.password().is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: creds
                .ssid()
                .try_into()
                .map_err(|_| anyhow::anyhow!("SSID exceeds 32 bytes"))?,
            password: creds
                .password()
                .try_into()
                .map_err(|_| anyhow::anyhow!("password exceeds 64 bytes"))?,
            auth_method,
            ..Default::default()
        }))?;

        wifi.start()?;
        info!("WiFi: connecting to '{}'", creds.ssid());
        wifi.connect().context("WiFi association failed")?;
        wifi.wait_netif_up().context("DHCP never completed")?;

        let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
        info!("WiFi: connected, ip={}", ip_info.ip);
        Ok(wifi)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_ssid() {
        assert_eq!(
            WifiCredentials::new("", "password123").unwrap_err(),
            ConnectivityError::InvalidSsid
        );
    }

    #[test]
    fn rejects_oversized_ssid() {
        let long = "x".repeat(33);
        assert_eq!(
            WifiCredentials::new(&long, "password123").unwrap_err(),
            ConnectivityError::InvalidSsid
        );
    }

    #[test]
    fn rejects_non_printable_ssid() {
        assert_eq!(
            WifiCredentials::new("net\u{7}work", "password123").unwrap_err(),
            ConnectivityError::InvalidSsid
        );
    }

    #[test]
    fn rejects_short_password() {
        assert_eq!(
            WifiCredentials::new("MyNet", "short").unwrap_err(),
            ConnectivityError::InvalidPassword
        );
    }

    #[test]
    fn accepts_open_network() {
        let c = WifiCredentials::new("OpenCafe", "").unwrap();
        assert_eq!(c.ssid(), "OpenCafe");
        assert!(c.password().is_empty());
    }

    #[test]
    fn accepts_valid_wpa2() {
        assert!(WifiCredentials::new("HomeWiFi", "mysecret8").is_ok());
    }
}
