//! # milight_bridge_rs
//!
//! An async Rust client for the Milight Wifi bridge (LimitlessLED v6 protocol).
//!
//! The bridge listens on UDP port 5987 and drives up to four zones of lights,
//! plus the indicator lamp on the bridge itself. This crate speaks its binary
//! protocol byte for byte: a start-session handshake per command, a 22-byte
//! request frame with a checksum trailer, and an 8-byte acknowledgment matched
//! against the request's sequence number.
//!
//! ## Quick Start
//!
//! ```ignore
//! use milight_bridge_rs::{Bridge, Zone};
//!
//! async fn control_lights() {
//!     let mut bridge = Bridge::new();
//!     if !bridge.setup("192.168.1.23", 5987, 5.0).await {
//!         return;
//!     }
//!
//!     bridge.turn_on(Zone::All).await;
//!     bridge.set_brightness(60, Zone::One).await;
//!     println!("bridge MAC: {}", bridge.get_mac_address().await);
//!     bridge.close();
//! }
//! ```
//!
//! ## Features
//!
//! - **Zones**: address all lights or one of four groups with [`Zone`]
//! - **Colors**: 256-step color wheel with [`Color`] presets
//! - **White**: brightness, saturation and [`Temperature`] in percent
//! - **Disco**: nine [`DiscoMode`] animations, faster or slower
//! - **Pairing**: link/unlink lights to a zone
//! - **Bridge lamp**: the same controls for the bridge's own lamp
//! - **Diagnostics**: frame history and last error via [`MessageHistory`]
//!
//! Every command method returns a plain `bool`; use [`Bridge::execute`] for a
//! [`Result`] carrying the precise [`Error`].
//!
//! ## Runtime Selection
//!
//! Select the async runtime with feature flags:
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod bridge;
mod command;
mod config;
mod errors;
pub mod frame;
mod history;
pub mod runtime;
mod session;
mod types;

// Re-export public API
pub use bridge::Bridge;
pub use command::{COMMAND_LEN, Command, CommandKind};
pub use config::BridgeConfig;
pub use errors::{Error, ErrorKind, Phase};
pub use history::{HistoryEntry, HistorySummary, MessageHistory, MessageType};
pub use session::{SequenceCounter, Session};
pub use types::{Brightness, Color, DiscoMode, Saturation, Temperature, TemperaturePreset, Zone};
