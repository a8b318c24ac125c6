//! Core domain types
//!
//! This module contains the structures shared by the client and the hook:
//! the immutable connection settings a client is bound to, and the decoded
//! documents the Carte server sends back.

pub mod connection;
pub mod response;
