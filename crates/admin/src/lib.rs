//! Maison Admin library.
//!
//! This crate provides the brand dashboard functionality as a library,
//! allowing it to be tested and reused by the integration-tests crate and
//! the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
