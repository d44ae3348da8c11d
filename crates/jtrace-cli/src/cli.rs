use jtrace_tracer::LaunchSpec;

/// The jtrace method tracer.
#[derive(clap::Parser)]
pub struct CliOpts {
    /// Tracing configuration (KDL format).
    ///
    /// If it ends with `.kdl`, it is treated as a path to a configuration
    /// file for the tracing operation. Otherwise it is directly parsed as
    /// inline KDL-formatted configuration.
    #[clap(
        short,
        long,
        global = true,
        env = "JTRACE_CONFIG",
        value_name = "CONTENT/PATH"
    )]
    pub config: Option<String>,

    /// The command to run.
    #[clap(subcommand)]
    pub action: CliAction,
}

/// The command to run.
#[derive(clap::Subcommand)]
pub enum CliAction {
    /// Command to attach to a running JVM and trace a method.
    Attach {
        /// ID of the JVM process.
        pid: u32,

        /// Method starting the trace.
        #[clap(flatten)]
        target: CliTarget,
    },

    /// Command to launch a JVM and trace a method.
    Launch {
        /// Command line launching the JVM, followed by the address its JDWP
        /// agent connects to (e.g., `java -agentlib:jdwp=transport=dt_socket,server=n,address=5005 Main:5005`).
        #[clap(value_name = "COMMAND:ADDRESS")]
        spec: LaunchSpec,

        /// Method starting the trace.
        #[clap(flatten)]
        target: CliTarget,
    },

    /// Command to list the available connections.
    List,
}

/// Method whose entry starts tracing a thread.
#[derive(clap::Args)]
pub struct CliTarget {
    /// Fully qualified name of the class declaring the method.
    pub class: String,

    /// Name of the method.
    pub method: String,
}

impl CliOpts {
    /// Parses the CLI from the command-line.
    ///
    /// # Warning
    ///
    /// Exits on error.
    pub fn parse_from_cmdline() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{CliAction, CliOpts};

    #[test]
    fn parse_attach() {
        let cli = CliOpts::try_parse_from(["jtrace", "attach", "4242", "com.example.Main", "run"])
            .expect("parse attach");

        let CliAction::Attach { pid, target } = cli.action else {
            unreachable!("expected attach");
        };

        assert_eq!(pid, 4242);
        assert_eq!(target.class, "com.example.Main");
        assert_eq!(target.method, "run");
    }

    #[test]
    fn parse_launch() {
        let cli = CliOpts::try_parse_from([
            "jtrace",
            "launch",
            "java -cp . Main:5005",
            "Main",
            "main",
            "--config",
            "watch-fields",
        ])
        .expect("parse launch");

        assert_eq!(cli.config.as_deref(), Some("watch-fields"));

        let CliAction::Launch { spec, .. } = cli.action else {
            unreachable!("expected launch");
        };

        assert_eq!(spec.command, "java -cp . Main");
        assert_eq!(spec.address, "5005");
    }

    #[test]
    fn parse_malformed() {
        assert!(CliOpts::try_parse_from(["jtrace", "launch", "java Main", "Main", "main"]).is_err());
        assert!(CliOpts::try_parse_from(["jtrace", "attach", "x", "Main", "main"]).is_err());
        assert!(CliOpts::try_parse_from(["jtrace", "attach", "1", "Main"]).is_err());
    }
}
