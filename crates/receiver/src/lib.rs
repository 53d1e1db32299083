//! Receiver role: consumes from the durable queue, simulates processing,
//! persists outcomes, and serves a recent-activity view.

pub mod app;
