//! NutriSculpt command-line front end
//!
//! One subcommand per calculator, optional `--share` export of the result
//! card, and saved display preferences.

pub mod app;
pub mod commands;
pub mod config;
pub mod surface;
