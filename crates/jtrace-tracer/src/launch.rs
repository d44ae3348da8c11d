use std::fmt;
use std::str::FromStr;

/// Specification of a process to launch and connect to.
///
/// It is written `<command>:<address>` on the command line, where `command`
/// is the full command line starting the debuggee and `address` is where
/// the debugger listens for the debuggee to connect back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Command line starting the debuggee.
    pub command: String,

    /// Address to listen on for the debuggee's connection.
    pub address: String,
}

impl LaunchSpec {
    /// Constructs a new `LaunchSpec` from a command line and a listening
    /// address.
    pub fn new(command: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            address: address.into(),
        }
    }
}

impl FromStr for LaunchSpec {
    type Err = LaunchSpecError;

    /// Parses `<command>:<address>`.
    ///
    /// The split happens on the **last** `:` so that commands containing
    /// `:` (e.g., a class path) are kept whole. The address itself is thus
    /// a bare port.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (command, address) = s.rsplit_once(':').ok_or(LaunchSpecError::MissingAddress)?;

        let command = command.trim();
        let address = address.trim();

        if command.is_empty() {
            return Err(LaunchSpecError::EmptyCommand);
        }

        if address.is_empty() {
            return Err(LaunchSpecError::MissingAddress);
        }

        Ok(Self::new(command, address))
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.command, self.address)
    }
}

/// Error returned when parsing a malformed [LaunchSpec].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LaunchSpecError {
    /// No address follows the command.
    #[error("invalid launch specification, expected <command>:<address>")]
    MissingAddress,

    /// The command is empty.
    #[error("invalid launch specification, the command is empty")]
    EmptyCommand,
}
