//! Crate implementing the CLI commands.

mod cli;
mod config;
mod run;

pub use self::cli::{CliAction, CliOpts, CliTarget};
pub use self::config::{Retire, TraceConfig};
pub use self::run::{TraceTarget, evaluate_list, evaluate_trace};
