//! Internal modules for the Okey table client.
//!
//! This library provides the websocket transport, the table tick loop,
//! command parsing and configuration used by the po_client binary.

pub mod commands;
pub mod config;
pub mod logging;
pub mod runner;
pub mod websocket_client;
