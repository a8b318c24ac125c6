//! Carte Core
//!
//! Core types and abstractions for talking to a Carte execution server.
//!
//! This crate contains:
//! - Domain types: connection settings and decoded server responses
//! - DTOs: request shapes sent to the server (execution requests, status queries)
//! - XML: the generic decoder used for every server response body

pub mod domain;
pub mod dto;
pub mod xml;
