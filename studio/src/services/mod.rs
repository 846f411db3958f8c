//! Studio services: batch loading, event replay, export and print payloads.

pub mod export;
pub mod loader;
pub mod print_payload;
pub mod script;
