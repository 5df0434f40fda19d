//! HTTP delivery layer.
//!
//! Three routes, matching the desk's original remote API:
//!
//! | Route                     | Effect                                      |
//! |---------------------------|---------------------------------------------|
//! | `GET  /desk/`             | current filtered height                     |
//! | `POST /desk/`             | move to an explicit target height           |
//! | `POST /desk/preset/{id}`  | move to a preset (1 = sit, 2 = stand)       |
//!
//! The payload types and the preset-URI parser are target-independent and
//! tested on the host; only the `EspHttpServer` wiring is espidf-gated.
//!
//! Handlers run on the HTTP server task and lock the shared [`DeskRuntime`]
//! for their whole duration — that mutex is what serializes concurrent move
//! requests (one outstanding move at a time; a second caller blocks until
//! the first move concludes).

use serde::{Deserialize, Serialize};

use crate::adapters::hardware::HardwareAdapter;
use crate::adapters::log_sink::LogEventSink;
use crate::adapters::time::UptimeClock;
use crate::app::service::DeskService;
use crate::control::motion::MoveResult;
use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Payloads
// ───────────────────────────────────────────────────────────────

/// Body of `POST /desk/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetHeightRequest {
    /// Target height in centimetres.
    pub height: u16,
}

/// Body of `GET /desk/` responses.
#[derive(Debug, Serialize)]
pub struct HeightResponse {
    pub height: i32,
}

/// Body of `POST /desk/` responses.
#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub desired_height: u16,
    pub current_height: i32,
    pub outcome: &'static str,
}

/// Body of `POST /desk/preset/{id}` responses.
#[derive(Debug, Serialize)]
pub struct PresetResponse {
    pub preset_id: u8,
    pub current_height: i32,
}

/// Error body for 4xx/5xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Parse a `POST /desk/` body.
pub fn parse_set_height(body: &[u8]) -> core::result::Result<SetHeightRequest, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Extract the preset id from a request URI like `/desk/preset/2`.
/// Trailing slashes and query strings are tolerated; a non-numeric or
/// out-of-range id is `None`.
pub fn parse_preset_uri(uri: &str) -> Option<u8> {
    let rest = uri.strip_prefix("/desk/preset/")?;
    let rest = rest.split('?').next().unwrap_or(rest);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.parse().ok()
}

// ───────────────────────────────────────────────────────────────
// Shared runtime state
// ───────────────────────────────────────────────────────────────

/// Everything a request handler needs, bundled so one mutex guards it all.
pub struct DeskRuntime {
    pub service: DeskService,
    pub hw: HardwareAdapter,
    pub clock: UptimeClock,
    pub sink: LogEventSink,
}

impl DeskRuntime {
    pub fn new(service: DeskService, hw: HardwareAdapter) -> Self {
        Self {
            service,
            hw,
            clock: UptimeClock::new(),
            sink: LogEventSink::new(),
        }
    }

    /// One sampling round, rounded for the API edge.
    pub fn current_height(&mut self) -> i32 {
        self.service.current_height(&mut self.hw).rounded_cm()
    }

    pub fn move_to(&mut self, target_cm: u16) -> Result<MoveResult> {
        self.service
            .move_to(target_cm, &mut self.hw, &self.clock, &mut self.sink)
    }

    pub fn apply_preset(&mut self, id: u8) -> Result<Option<MoveResult>> {
        self.service
            .apply_preset(id, &mut self.hw, &self.clock, &mut self.sink)
    }
}

// ───────────────────────────────────────────────────────────────
// Server wiring (espidf only)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use server::serve;

#[cfg(target_os = "espidf")]
mod server {
    use std::sync::{Arc, Mutex, MutexGuard};

    use anyhow::anyhow;
    use embedded_svc::http::server::{Connection, Request};
    use embedded_svc::io::{Read, Write};
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration as HttpConfig, EspHttpServer};
    use log::info;
    use serde::Serialize;

    use super::{
        DeskRuntime, ErrorResponse, HeightResponse, MoveResponse, PresetResponse,
        parse_preset_uri, parse_set_height,
    };
    use crate::error::Error;

    /// Targets are three-digit numbers; anything bigger is garbage.
    const MAX_BODY_BYTES: usize = 256;

    /// Handlers sample the sensor and serialize JSON on the server task.
    const HTTP_STACK_BYTES: usize = 10 * 1024;

    /// Register all routes.  The returned server must stay alive for the
    /// process lifetime.
    pub fn serve(runtime: Arc<Mutex<DeskRuntime>>) -> anyhow::Result<EspHttpServer<'static>> {
        let mut http = EspHttpServer::new(&HttpConfig {
            stack_size: HTTP_STACK_BYTES,
            uri_match_wildcard: true,
            ..Default::default()
        })?;

        let rt = runtime.clone();
        http.fn_handler::<anyhow::Error, _>("/desk/", Method::Get, move |req| {
            let height = lock(&rt)?.current_height();
            write_json(req, 200, &HeightResponse { height })
        })?;

        let rt = runtime.clone();
        http.fn_handler::<anyhow::Error, _>("/desk/", Method::Post, move |mut req| {
            let mut buf = [0u8; MAX_BODY_BYTES];
            let len = read_body(&mut req, &mut buf)?;
            let cmd = match parse_set_height(&buf[..len]) {
                Ok(cmd) => cmd,
                Err(e) => {
                    return write_json(
                        req,
                        400,
                        &ErrorResponse {
                            error: format!("invalid body: {e}"),
                        },
                    );
                }
            };

            let result = lock(&rt)?.move_to(cmd.height);
            match result {
                Ok(r) => write_json(
                    req,
                    200,
                    &MoveResponse {
                        desired_height: cmd.height,
                        current_height: r.final_height_cm.round() as i32,
                        outcome: r.outcome.as_str(),
                    },
                ),
                Err(err @ Error::InvalidTarget { .. }) => write_json(
                    req,
                    422,
                    &ErrorResponse {
                        error: err.to_string(),
                    },
                ),
                Err(err) => write_json(
                    req,
                    500,
                    &ErrorResponse {
                        error: err.to_string(),
                    },
                ),
            }
        })?;

        let rt = runtime.clone();
        http.fn_handler::<anyhow::Error, _>("/desk/preset/*", Method::Post, move |req| {
            let Some(id) = parse_preset_uri(req.uri()) else {
                return write_json(
                    req,
                    400,
                    &ErrorResponse {
                        error: "preset id must be a number".to_string(),
                    },
                );
            };

            let mut rt = lock(&rt)?;
            // Unknown ids come back Ok(None): a no-op that still reports
            // the current height, like any other preset call.
            if let Err(err) = rt.apply_preset(id) {
                return write_json(
                    req,
                    500,
                    &ErrorResponse {
                        error: err.to_string(),
                    },
                );
            }
            let height = rt.current_height();
            drop(rt);
            write_json(
                req,
                200,
                &PresetResponse {
                    preset_id: id,
                    current_height: height,
                },
            )
        })?;

        info!("HTTP: routes registered (GET /desk/, POST /desk/, POST /desk/preset/{{id}})");
        Ok(http)
    }

    fn lock<'a>(rt: &'a Arc<Mutex<DeskRuntime>>) -> anyhow::Result<MutexGuard<'a, DeskRuntime>> {
        rt.lock().map_err(|_| anyhow!("desk runtime mutex poisoned"))
    }

    fn read_body<C>(req: &mut Request<C>, buf: &mut [u8]) -> anyhow::Result<usize>
    where
        C: Connection,
        C::Error: std::error::Error + Send + Sync + 'static,
    {
        let mut len = 0;
        while len < buf.len() {
            let n = req.read(&mut buf[len..])?;
            if n == 0 {
                break;
            }
            len += n;
        }
        Ok(len)
    }

    fn write_json<C, T>(req: Request<C>, status: u16, payload: &T) -> anyhow::Result<()>
    where
        C: Connection,
        C::Error: std::error::Error + Send + Sync + 'static,
        T: Serialize,
    {
        let body = serde_json::to_string(payload)?;
        let mut response =
            req.into_response(status, None, &[("Content-Type", "application/json")])?;
        response.write_all(body.as_bytes())?;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
