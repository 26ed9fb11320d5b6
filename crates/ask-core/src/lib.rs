//! Core library for ask (transcript controller, providers, config, logging).

pub mod config;
pub mod logging;
pub mod providers;
pub mod transcript;
