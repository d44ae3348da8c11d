use super::SessionState;
use super::dispatch::Dispatcher;
use crate::debugger::DebugSession;
use crate::sink::TraceSink;

/// Connected debuggee ready to be resumed and traced.
pub struct TracedSession<S: DebugSession, K> {
    dispatcher: Dispatcher<S, K>,
}

impl<S, K> TracedSession<S, K>
where
    S: DebugSession,
    K: TraceSink,
{
    pub(super) const fn new(dispatcher: Dispatcher<S, K>) -> Self {
        Self { dispatcher }
    }

    /// Installs the trace requests, resumes the debuggee and traces its
    /// execution.
    ///
    /// Every trace line is written to the sink specified when
    /// [building the tracer](super::Builder).
    ///
    /// On success, the final state of the session is returned (either
    /// [ExitedNormally](SessionState::ExitedNormally) or
    /// [Disconnected](SessionState::Disconnected)) as well as the sink.
    pub async fn resume_and_trace(mut self) -> crate::Result<(SessionState, K), S::Error, K::Error> {
        self.dispatcher.install_requests().await?;
        self.dispatcher.resume().await?;
        self.dispatcher.run().await
    }
}
