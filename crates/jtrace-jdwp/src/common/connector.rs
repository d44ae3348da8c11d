use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use jtrace_tracer::LaunchSpec;
use jtrace_tracer::debugger::{Connector, TransportDescriptor};

use tokio::net::{TcpListener, TcpStream};
use tokio::process::Command;

use super::agent::{AgentError, local_address};
use super::connection::Connection;
use super::session::JdwpSession;
use crate::{Error, Result, sys};

/// Name of the connector attaching to a running process.
pub const PROCESS_ATTACH: &str = "jtrace.ProcessAttach";

/// Name of the connector launching a process.
pub const RAW_COMMAND_LINE_LAUNCH: &str = "jtrace.RawCommandLineLaunch";

/// Options of a [JdwpConnector].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Maximum time spent reaching the debuggee and performing the
    /// handshake.
    pub connect_timeout: Duration,

    /// How long a single wait for an event batch lasts before it is reported
    /// as interrupted.
    pub wait_interval: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(5000),
            wait_interval: Duration::from_millis(500),
        }
    }
}

/// Connector reaching JDWP debuggees over sockets.
#[derive(Clone, Debug, Default)]
pub struct JdwpConnector {
    options: ConnectOptions,
}

impl JdwpConnector {
    /// Creates a new connector.
    pub const fn new(options: ConnectOptions) -> Self {
        Self { options }
    }

    async fn establish(&self, stream: TcpStream) -> Result<Connection<tokio::net::tcp::OwnedWriteHalf>> {
        stream.set_nodelay(true)?;

        let (reader, writer) = stream.into_split();

        within(
            self.options.connect_timeout,
            "performing the JDWP handshake",
            Connection::establish(reader, writer),
        )
        .await
    }
}

impl Connector for JdwpConnector {
    type Session = JdwpSession;
    type Error = Error;

    #[tracing::instrument(name = "JdwpAttach", skip(self))]
    async fn attach(&mut self, process_id: u32) -> Result<Self::Session> {
        let options = sys::agent_options(process_id)
            .await?
            .ok_or(AgentError::NotFound(process_id))?;

        let address = options.socket_address()?;

        tracing::debug!(address, "JDWP agent found");

        let stream = within(self.options.connect_timeout, "connecting to the debuggee", async {
            Ok(TcpStream::connect(&address).await?)
        })
        .await?;

        let conn = self.establish(stream).await?;

        Ok(JdwpSession::new(conn, self.options.wait_interval, None))
    }

    #[tracing::instrument(name = "JdwpLaunch", skip_all, fields(spec = %spec))]
    async fn launch(&mut self, spec: LaunchSpec) -> Result<Self::Session> {
        let address = local_address(&spec.address);

        let listener = TcpListener::bind(&address)
            .await
            .map_err(|_| Error::InvalidAddress(spec.address.clone()))?;

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&spec.command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        tracing::debug!(pid = child.id(), address, "debuggee launched");

        let stream = within(
            self.options.connect_timeout,
            "waiting for the debuggee to connect",
            async {
                tokio::select! {
                    accepted = listener.accept() => Ok(accepted?.0),
                    status = child.wait() => Err(Error::LaunchExited(status?)),
                }
            },
        )
        .await?;

        let conn = self.establish(stream).await?;

        Ok(JdwpSession::new(conn, self.options.wait_interval, Some(child)))
    }

    fn transports(&self) -> Vec<TransportDescriptor> {
        vec![
            TransportDescriptor {
                name: PROCESS_ATTACH.to_owned(),
                transport: "dt_socket".to_owned(),
                description: "Attaches by process ID to a debuggee whose JDWP agent listens on a socket"
                    .to_owned(),
            },
            TransportDescriptor {
                name: RAW_COMMAND_LINE_LAUNCH.to_owned(),
                transport: "dt_socket".to_owned(),
                description: "Launches a debuggee with a raw command line and accepts its JDWP connection"
                    .to_owned(),
            },
        ]
    }
}

async fn within<T>(
    duration: Duration,
    action: &'static str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| Error::Timeout(duration, action))?
}
