//! HTTP route modules.

pub mod verify;
