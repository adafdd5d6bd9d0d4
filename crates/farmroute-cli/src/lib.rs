//! Farm route CLI library.
//!
//! Terminal styling and output formatting shared by the `farmroute-cli`
//! subcommands.

pub mod output;
pub mod terminal;
