//! Command handlers

pub mod config;
pub mod document;
pub mod record;
pub mod settings;
