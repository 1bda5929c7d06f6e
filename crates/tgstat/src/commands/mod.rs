//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod parse;
pub mod stats;
pub mod watch;
