mod builder;
mod context;
mod dispatch;
mod tracee;
mod watch;

use std::fmt;

pub use self::builder::Builder;
use self::builder::NeedsConnector;
pub use self::context::{ContextState, ThreadContext, ThreadIdAllocator};
use self::dispatch::Dispatcher;
pub use self::tracee::TracedSession;
pub use self::watch::FieldWatchInstaller;
use crate::LaunchSpec;
use crate::debugger::{Connector, MethodName};
use crate::sink::TraceSink;

/// Default class patterns excluded from tracing.
pub const DEFAULT_EXCLUSIONS: [&str; 6] = [
    "java.*",
    "javax.*",
    "sun.*",
    "com.sun.*",
    "org.jboss.*",
    "org.apache.*",
];

/// Process tracer.
pub struct Tracer<C, K> {
    /// Connector to the debuggee.
    pub(super) connector: C,

    /// Destination of the trace lines.
    pub(super) sink: K,

    /// What to trace and when to stop tracing a thread.
    pub(super) config: TraceConfig,
}

impl Tracer<(), ()> {
    /// Creates a tracer builder.
    pub const fn builder() -> Builder<NeedsConnector> {
        Builder::new()
    }
}

impl<C: Connector, K: TraceSink> Tracer<C, K> {
    /// Attaches to the running process with the given ID.
    ///
    /// # Note
    ///
    /// Nothing is traced until [resume_and_trace](TracedSession::resume_and_trace)
    /// is called.
    #[tracing::instrument(name = "Attach", skip(self))]
    pub async fn attach(mut self, process_id: u32) -> Result<TracedSession<C::Session, K>, C::Error> {
        let session = self.connector.attach(process_id).await?;

        tracing::info!("attached");

        Ok(self.into_traced(session))
    }

    /// Launches a process and connects to it.
    ///
    /// # Note
    ///
    /// Nothing is traced until [resume_and_trace](TracedSession::resume_and_trace)
    /// is called.
    #[tracing::instrument(name = "Launch", skip_all, fields(spec = %spec))]
    pub async fn launch(mut self, spec: LaunchSpec) -> Result<TracedSession<C::Session, K>, C::Error> {
        let session = self.connector.launch(spec).await?;

        tracing::info!("launched");

        Ok(self.into_traced(session))
    }

    fn into_traced(self, session: C::Session) -> TracedSession<C::Session, K> {
        TracedSession::new(Dispatcher::new(session, self.sink, self.config))
    }
}

/// Tracing configuration shared by the dispatcher.
pub(crate) struct TraceConfig {
    pub(crate) scope: TraceScope,
    pub(crate) retire: RetirePolicy,
    pub(crate) exclusions: Vec<String>,
    pub(crate) watch_fields: bool,
}

/// Methods whose entry starts tracing a thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceScope {
    /// Every method entry starts tracing its thread.
    All,

    /// Only entering the given method starts tracing its thread.
    Method(MethodName),
}

impl TraceScope {
    /// Returns whether entering `method` starts tracing a thread.
    pub fn opens(&self, method: &MethodName) -> bool {
        match self {
            Self::All => true,
            Self::Method(root) => root == method,
        }
    }

    /// Returns whether `method` is the root of the scope.
    pub fn is_root(&self, method: &MethodName) -> bool {
        match self {
            Self::All => false,
            Self::Method(root) => root == method,
        }
    }
}

impl fmt::Display for TraceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Method(method) => method.fmt(f),
        }
    }
}

/// When a traced thread stops being traced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetirePolicy {
    /// When the method starting the trace scope returns (or at thread death).
    #[default]
    OnScopeExit,

    /// Only at thread death.
    OnThreadDeath,
}

/// State of a debug session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The debuggee is connected but not resumed yet.
    Connecting,

    /// The debuggee is running.
    Running,

    /// The debuggee has exited.
    ExitedNormally,

    /// The link to the debuggee was lost while it was running.
    Disconnected,
}

impl SessionState {
    /// Returns whether the session has ended.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ExitedNormally | Self::Disconnected)
    }
}
