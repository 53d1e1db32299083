//! Sender role: accepts units of work over HTTP, persists them, and
//! publishes them onto the durable queue.

pub mod app;
