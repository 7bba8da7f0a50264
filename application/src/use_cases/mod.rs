//! Use cases (application services)

pub mod chat_controller;
pub mod stream_relay;
