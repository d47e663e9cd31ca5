//! Terminal front-end for the Lendsqr users dashboard.
//!
//! The `lendsqr` binary is a thin wrapper over these modules; integration
//! tests drive the same command code against a mock server.

pub mod cli;
pub mod commands;
pub mod context;
pub mod output;
pub mod render;
pub mod timing;
