//! Shared plain-text documents edited by many clients at once.
//!
//! Clients join a room per document id over a WebSocket; every change is
//! fanned out to the other members and written to the store, last write
//! wins. There is no merging of concurrent edits.

pub mod client;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod websocket;
pub mod ws;
