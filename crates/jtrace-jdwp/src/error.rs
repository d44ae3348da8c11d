use std::process::ExitStatus;
use std::time::Duration;

/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The debuggee did not answer the JDWP handshake.
    #[error("JDWP handshake failed, received {0:?}")]
    Handshake(String),

    /// An operation took longer than allowed.
    #[error("timed out after {0:?} while {1}")]
    Timeout(Duration, &'static str),

    /// Malformed JDWP data.
    #[error(transparent)]
    Protocol(#[from] crate::protocol::ProtocolError),

    /// The debuggee rejected a command.
    #[error("JDWP command {set}/{command} failed with error code {code}")]
    Command {
        /// Command set of the rejected command.
        set: u8,
        /// Rejected command.
        command: u8,
        /// JDWP error code.
        code: u16,
    },

    /// The connection to the debuggee was closed.
    #[error("the connection to the debuggee was closed")]
    Disconnected,

    /// Malformed debuggee address.
    #[error("invalid debuggee address: {0:?}")]
    InvalidAddress(String),

    /// The launched debuggee exited before connecting back.
    #[error("the launched process exited before connecting ({0})")]
    LaunchExited(ExitStatus),

    /// The JDWP agent of the debuggee cannot be attached to.
    #[error(transparent)]
    Agent(#[from] crate::common::agent::AgentError),

    /// Internal (platform-specific) error.
    #[error(transparent)]
    DebuggerInternal(#[from] crate::sys::Error),
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
