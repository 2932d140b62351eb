//! Weather board - city weather cards, favorites and a map in the terminal
//!
//! The library exposes every module so the binary and the integration
//! tests share one implementation.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod drag;
pub mod effect;
pub mod logging;
pub mod model;
pub mod reducer;
pub mod signal;
pub mod state;
pub mod store;
pub mod views;
