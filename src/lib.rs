//! Email Finder Relay Library
//!
//! A small HTTP relay in front of the Prospeo email-finder API. It normalizes
//! browser-originated lookups, forwards them with the caller's key, tags the
//! response with request metadata and keeps an in-memory ledger of every
//! call for verification.
//!
//! # Modules
//!
//! - `app`: Router construction and middleware.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and shared state.
//! - `ledger`: Request counter and call log.
//! - `models`: Request, ledger and report types.
//! - `normalize`: Company identifier normalization.
//! - `prospeo_client`: Email-finder API client.
//! - `relay`: Lookup validation, forwarding and response shaping.

pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod normalize;
pub mod prospeo_client;
pub mod relay;
