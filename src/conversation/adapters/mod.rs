//! Adapters for the conversation module.
//!
//! This module provides concrete implementations of the conversation ports,
//! following hexagonal architecture principles. Adapters handle all
//! infrastructure concerns while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory`]: Thread-safe in-memory stores for tests and local runs
//! - [`postgres`]: `PostgreSQL` stores using Diesel ORM
//! - [`gemini`]: Agent client over the Google Gemini REST API

pub mod gemini;
pub mod memory;
pub mod postgres;
