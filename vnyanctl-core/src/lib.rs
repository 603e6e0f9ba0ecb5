//! vnyanctl - VNyan WebSocket command dispatcher
//!
//! Forwards a single textual command to a locally running VNyan instance over
//! a WebSocket connection, triggered at startup or by a Twitch channel-point
//! reward redemption.

pub mod dispatcher;
pub mod gate;
pub mod models;
pub mod services;
pub mod transport;
pub mod twitch;
