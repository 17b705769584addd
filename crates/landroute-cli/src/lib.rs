//! Landroute CLI library.
//!
//! Output formatting shared by the `landroute` binary's subcommands.

pub mod output;
