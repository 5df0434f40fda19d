//! desklift — Main Entry Point
//!
//! Hexagonal architecture: the domain core (service + motion controller)
//! only ever talks to port traits; this binary wires the real adapters to
//! those ports and parks in a supervision loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter     LogEventSink    UptimeClock             │
//! │  (Sensor+Relay)      (EventSink)     (Clock)                 │
//! │  WiFi station        EspHttpServer                           │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            DeskService (pure logic)                  │    │
//! │  │  height sampling · move state machine · presets      │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Moves execute synchronously on the HTTP server task, serialized by the
//! runtime mutex; the main task only feeds the watchdog.

#![deny(unused_must_use)]

use std::sync::{Arc, Mutex};

use anyhow::Context;
use log::{error, info};

use desklift::adapters::hardware::HardwareAdapter;
use desklift::adapters::http::{self, DeskRuntime};
use desklift::adapters::log_sink::LogEventSink;
use desklift::adapters::wifi::{self, WifiCredentials};
use desklift::app::service::DeskService;
use desklift::config::DeskConfig;
use desklift::drivers::hw_init;
use desklift::drivers::watchdog::Watchdog;

/// The supervision loop feeds every second; trip well above that.
const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

fn main() -> anyhow::Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("desklift v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (fatal on any error) ─────────────────
    let config = match DeskConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("config: {e} — refusing to start");
            return Err(anyhow::anyhow!("configuration error: {e}"));
        }
    };
    info!(
        "config: targets {}..={} cm, sit={} stand={}, tolerance ±{} cm, move timeout {} s",
        config.min_height_cm,
        config.max_height_cm,
        config.sit_height_cm,
        config.stand_height_cm,
        config.tolerance_cm,
        config.move_timeout_secs,
    );

    // ── 3. Peripherals (relays released before anything else) ─
    hw_init::init_peripherals(&config)
        .map_err(|e| anyhow::anyhow!("peripheral init failed: {e}"))?;

    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let sysloop = esp_idf_svc::eventloop::EspSystemEventLoop::take()?;

    // ── 4. Network ────────────────────────────────────────────
    let creds = WifiCredentials::from_build_env()
        .map_err(|e| anyhow::anyhow!("wifi credentials: {e}"))?;
    let _wifi = wifi::station::connect(peripherals.modem, sysloop, &creds)
        .context("WiFi bring-up failed")?;

    // ── 5. Adapters + service ─────────────────────────────────
    let mut hw = HardwareAdapter::new(&config);
    let mut sink = LogEventSink::new();
    let mut service =
        DeskService::new(config).map_err(|e| anyhow::anyhow!("service construction: {e}"))?;
    service.start(&mut hw, &mut sink);

    // ── 6. HTTP API ───────────────────────────────────────────
    let runtime = Arc::new(Mutex::new(DeskRuntime::new(service, hw)));
    let _server = http::serve(runtime).context("HTTP server start failed")?;
    info!("system ready, API listening on port 80");

    // ── 7. Supervision loop ───────────────────────────────────
    let watchdog = Watchdog::new(WATCHDOG_TIMEOUT_MS);
    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(1_000);
        watchdog.feed();
    }
}
