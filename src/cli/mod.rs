//! Command-line interface over JSON element files.

pub mod commands;
