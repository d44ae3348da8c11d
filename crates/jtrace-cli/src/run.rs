use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use jtrace_jdwp::{ConnectOptions, JdwpConnector};
use jtrace_tracer::LaunchSpec;
use jtrace_tracer::debugger::TransportDescriptor;
use jtrace_tracer::sink::TextSink;
use jtrace_tracer::tracer::Tracer;
use miette::{Context, IntoDiagnostic};

use crate::config::TraceConfig;

/// How to reach the process to trace.
pub enum TraceTarget {
    /// Attach to the running process with the given ID.
    Attach(u32),

    /// Launch a process and wait for it to connect back.
    Launch(LaunchSpec),
}

/// Traces `class.method` in the target process, until it exits or
/// disconnects.
pub fn evaluate_trace(
    target: TraceTarget,
    class: String,
    method: String,
    config: Option<String>,
) -> miette::Result<i32> {
    let config = parse_trace_config(config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    runtime.block_on(async move {
        let connector = JdwpConnector::new(ConnectOptions {
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            wait_interval: Duration::from_millis(config.wait_interval_ms),
        });

        let builder = Tracer::builder()
            .with_connector(connector)
            .with_sink(TextSink::new(tokio::io::stdout()))
            .trace_method(class, method)
            .retire_on(config.retire.into())
            .watch_fields(config.watch_fields);

        let tracer = if config.exclusions.is_empty() {
            builder.build()
        } else {
            builder.exclusions(config.exclusions).build()
        };

        let session = match target {
            TraceTarget::Attach(pid) => tracer
                .attach(pid)
                .await
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to attach to process {pid}"))?,
            TraceTarget::Launch(spec) => tracer
                .launch(spec)
                .await
                .into_diagnostic()
                .wrap_err("failed to launch the process")?,
        };

        session.resume_and_trace().await.into_diagnostic()?;

        Ok(0)
    })
}

/// Lists the given connection transports into `out`.
///
/// Nothing is traced, so this always reports failure.
pub fn evaluate_list(transports: &[TransportDescriptor], mut out: impl Write) -> miette::Result<i32> {
    writeln!(out, "Connections:").into_diagnostic()?;

    for transport in transports {
        writeln!(out, "{}", transport.name).into_diagnostic()?;
        writeln!(out, "\t{}", transport.transport).into_diagnostic()?;
        writeln!(out, "\t{}", transport.description).into_diagnostic()?;
    }

    out.flush().into_diagnostic()?;

    Ok(1)
}

fn parse_trace_config(config: Option<String>) -> miette::Result<TraceConfig> {
    let Some(config) = config else {
        return Ok(knus::parse("<content>", "")?);
    };

    let path = Path::new(&config);

    let config = if let Some((filename, "kdl")) = path
        .file_name()
        .and_then(OsStr::to_str)
        .zip(path.extension().and_then(OsStr::to_str))
    {
        let content = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;

        knus::parse(filename, &content)?
    } else {
        knus::parse("<content>", &config)?
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use jtrace_tracer::debugger::TransportDescriptor;

    use super::{evaluate_list, parse_trace_config};
    use crate::config::Retire;

    #[test]
    fn config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".kdl").tempfile().expect("temp file");

        file.write_all(
            indoc::indoc! {r#"
                retire "on-thread-death"
                wait-interval-ms 100
            "#}
            .as_bytes(),
        )
        .expect("write config");

        let path = file.path().to_string_lossy().into_owned();
        let config = parse_trace_config(Some(path)).expect("parse config file");

        assert_eq!(config.retire, Retire::OnThreadDeath);
        assert_eq!(config.wait_interval_ms, 100);
        assert_eq!(config.connect_timeout_ms, 5000);
    }

    #[test]
    fn config_inline() {
        let config = parse_trace_config(Some("watch-fields".to_owned())).expect("parse inline config");
        assert!(config.watch_fields);

        let config = parse_trace_config(None).expect("parse default config");
        assert!(!config.watch_fields);
    }

    #[test]
    fn config_missing_file() {
        assert!(parse_trace_config(Some("/nonexistent/jtrace.kdl".to_owned())).is_err());
    }

    #[test]
    fn list_transports() {
        let transports = [TransportDescriptor {
            name: "jtrace.ProcessAttach".to_owned(),
            transport: "dt_socket".to_owned(),
            description: "Attaches to a process by ID".to_owned(),
        }];

        let mut out = Vec::new();
        let code = evaluate_list(&transports, &mut out).expect("list transports");

        assert_eq!(code, 1);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Connections:\njtrace.ProcessAttach\n\tdt_socket\n\tAttaches to a process by ID\n"
        );
    }

    #[test]
    fn list_without_transports() {
        let mut out = Vec::new();
        let code = evaluate_list(&[], &mut out).expect("list transports");

        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).expect("utf8"), "Connections:\n");
    }
}
