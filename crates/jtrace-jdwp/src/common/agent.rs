use std::str::FromStr;

/// Environment variables the JVM reads extra options from.
pub const OPTIONS_VARIABLES: [&str; 2] = ["JAVA_TOOL_OPTIONS", "JDK_JAVA_OPTIONS"];

/// Error finding or using the JDWP agent of a debuggee.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AgentError {
    /// No JDWP agent is loaded by the process.
    #[error("process {0} was not started with a JDWP agent")]
    NotFound(u32),

    /// The agent uses a transport other than sockets.
    #[error("JDWP transport {0:?} is not supported (dt_socket expected)")]
    UnsupportedTransport(String),

    /// The agent connects out instead of listening.
    #[error("the JDWP agent is not listening (server=y expected)")]
    NotServer,

    /// The agent options have no address.
    #[error("the JDWP agent has no address")]
    MissingAddress,
}

/// Options given to the JDWP agent of a debuggee.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentOptions {
    pub transport: Option<String>,
    pub server: bool,
    pub address: Option<String>,
}

impl AgentOptions {
    /// Finds the agent options among the arguments of a JVM.
    pub fn find<'a>(args: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        args.into_iter().find_map(|arg| {
            let options = arg
                .strip_prefix("-agentlib:jdwp=")
                .or_else(|| arg.strip_prefix("-Xrunjdwp:"))?;

            options.parse().ok()
        })
    }

    /// Finds the agent options within the options environment variables of
    /// a JVM, given as `NAME=VALUE` entries.
    pub fn find_in_environment<'a>(vars: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        vars.into_iter()
            .filter_map(|var| var.split_once('='))
            .filter(|(name, _)| OPTIONS_VARIABLES.contains(name))
            .find_map(|(_, value)| Self::find(value.split_whitespace()))
    }

    /// Returns the socket address to connect to.
    pub fn socket_address(&self) -> Result<String, AgentError> {
        match self.transport.as_deref() {
            Some("dt_socket") => (),
            other => {
                return Err(AgentError::UnsupportedTransport(
                    other.unwrap_or_default().to_owned(),
                ));
            }
        }

        if !self.server {
            return Err(AgentError::NotServer);
        }

        self.address
            .as_deref()
            .map(local_address)
            .ok_or(AgentError::MissingAddress)
    }
}

impl FromStr for AgentOptions {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = Self::default();

        for (key, value) in s.split(',').filter_map(|opt| opt.split_once('=')) {
            match key {
                "transport" => options.transport = Some(value.to_owned()),
                "server" => options.server = value == "y",
                "address" => options.address = Some(value.to_owned()),
                _ => (),
            }
        }

        Ok(options)
    }
}

/// Turns a JDWP address into a connectable socket address.
///
/// A bare port and wildcard hosts (`*`, `0.0.0.0`) mean the loopback
/// interface.
pub fn local_address(address: &str) -> String {
    match address.rsplit_once(':') {
        None => format!("127.0.0.1:{address}"),
        Some(("*" | "0.0.0.0" | "", port)) => format!("127.0.0.1:{port}"),
        Some(_) => address.to_owned(),
    }
}
