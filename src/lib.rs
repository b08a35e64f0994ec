//! Graso Backend Library
//!
//! Wallet-authenticated profile and property listing API: a nonce/signature
//! handshake issues bearer tokens that gate profile and listing operations.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod uploads;
