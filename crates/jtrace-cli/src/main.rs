#![allow(missing_docs)]
#![allow(clippy::print_stderr)]

use jtrace_cli::{CliAction, CliOpts, TraceTarget};
use jtrace_jdwp::JdwpConnector;
use jtrace_tracer::debugger::Connector;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = CliOpts::parse_from_cmdline();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("JTRACE_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let res = match cli.action {
        CliAction::Attach { pid, target } => jtrace_cli::evaluate_trace(
            TraceTarget::Attach(pid),
            target.class,
            target.method,
            cli.config,
        ),
        CliAction::Launch { spec, target } => jtrace_cli::evaluate_trace(
            TraceTarget::Launch(spec),
            target.class,
            target.method,
            cli.config,
        ),
        CliAction::List => {
            let transports = JdwpConnector::default().transports();
            jtrace_cli::evaluate_list(&transports, std::io::stdout().lock())
        }
    };

    match res {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}
