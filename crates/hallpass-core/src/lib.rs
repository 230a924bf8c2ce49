//! Core library for hallpass - client-side session lifecycle management.
//!
//! This crate owns the authentication state of a client application:
//! acquiring a bearer token, decoding and validating its claims, persisting
//! it across runs, and gating navigation on the resulting session state.
//!
//! Modules:
//! - `auth`: session state machine, token codec, token store, credentials
//! - `api`: REST client for the credential and registration exchanges
//! - `nav`: route table and navigation guard with redirect-back semantics
//! - `prefs`: light/dark theme preference store
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod nav;
pub mod prefs;
