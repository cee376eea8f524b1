//! Host side of the vellum rich-text editor bridge.
//!
//! The editor runs as embedded web content; the two runtimes share no memory
//! and talk only through asynchronous script evaluation and intercepted
//! navigation events. This crate provides:
//!
//! - `gateway`: the script execution gateway and host capability traits
//! - `events`: the optional-observer notification trait
//! - `join`: fan-out/fan-in coordination for independent async probes
//! - `bridge`: the state mirror, command dispatcher, and caret visibility
//!   coordinator
//!
//! Everything runs on a single coordination context: construct the bridge
//! inside a current-thread `tokio::task::LocalSet` and drive it from there.
//! Bridge futures are intentionally `!Send`; no callback ever runs
//! concurrently with another.
//!
//! # Re-exports
//!
//! `vellum-bridge-core` is re-exported in full, so embedders only need this
//! crate.

pub use vellum_bridge_core;
pub use vellum_bridge_core::*;

pub mod bridge;
pub mod events;
pub mod gateway;
pub mod join;

pub use bridge::EditorBridge;
pub use events::{EditorEvents, NavigationKind, NavigationPolicy, NullEvents};
pub use gateway::{ScriptError, ScriptGateway, ScriptHost, ScrollHost};
