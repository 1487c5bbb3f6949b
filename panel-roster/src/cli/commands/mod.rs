//! Subcommand handlers

pub mod export;
pub mod hash_password;
pub mod import;
pub mod serve;
