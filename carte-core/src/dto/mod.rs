//! Data Transfer Objects for Carte requests
//!
//! This module contains the request shapes the client turns into query
//! strings and form bodies. They hold no transport state and can be built
//! and inspected without a server.

pub mod execution;
pub mod status;
