//! Pokedex Explorer - PokeAPI catalog browser built on tui-dispatch
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod cache;
pub mod components;
pub mod config;
pub mod effect;
pub mod error;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod view;
