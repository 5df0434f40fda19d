//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                |
//! |------------|-------------------|----------------------------|
//! | `hardware` | HeightSensorPort  | HC-SR04 trigger/echo GPIO  |
//! |            | RelayPort         | Relay board GPIO           |
//! | `log_sink` | EventSink         | Serial log output          |
//! | `time`     | Clock             | ESP32 system timer         |
//! | `http`     | (delivery layer)  | ESP-IDF HTTP server        |
//! | `wifi`     | (connectivity)    | ESP-IDF WiFi STA           |

pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
