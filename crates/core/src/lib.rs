//! Core business logic for Partida.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Domain types, rule selection, journal drafting and validation live here.
//!
//! # Modules
//!
//! - `posting` - Accounting rule resolution and double-entry journal drafting

pub mod posting;
