//! Chest X-ray pneumonia classifier: the inference pipeline plus the HTTP
//! routes and CLI helpers built on it.

pub mod annotate;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
