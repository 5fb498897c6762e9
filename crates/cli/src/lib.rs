//! Keeper CLI - backup pruning driven by retention policies

pub mod cmd;
pub mod system_config;
pub mod util;
