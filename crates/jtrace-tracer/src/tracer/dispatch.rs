use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::Instrument;

use super::context::{ThreadContext, ThreadIdAllocator};
use super::watch::FieldWatchInstaller;
use super::{RetirePolicy, SessionState, TraceConfig};
use crate::debugger::{BatchWait, DebugEvent, DebugSession, EventBatch, MethodName, SuspendPolicy};
use crate::error::{DebuggerError, SinkError};
use crate::sink::TraceSink;

/// Single consumer of the debuggee's event batches.
pub(crate) struct Dispatcher<S: DebugSession, K> {
    /// Debug session over the debuggee.
    session: S,

    /// Destination of the trace lines.
    sink: K,

    /// What to trace and when to stop tracing a thread.
    config: TraceConfig,

    /// Trace context of every traced thread.
    contexts: HashMap<S::Thread, ThreadContext<S::RequestId>>,

    /// Pending single-shot step requests, with the thread owning them.
    pending_steps: HashMap<S::RequestId, S::Thread>,

    /// Allocator of the IDs printed on thread lines.
    ids: ThreadIdAllocator,

    /// Field watch installer, if field watching is enabled.
    watcher: Option<FieldWatchInstaller>,

    /// State of the debug session.
    state: SessionState,
}

impl<S, K> Dispatcher<S, K>
where
    S: DebugSession,
    K: TraceSink,
{
    pub fn new(session: S, sink: K, config: TraceConfig) -> Self {
        let watcher = config
            .watch_fields
            .then(|| FieldWatchInstaller::new(config.exclusions.clone()));

        Self {
            session,
            sink,
            config,
            contexts: HashMap::new(),
            pending_steps: HashMap::new(),
            ids: ThreadIdAllocator::new(),
            watcher,
            state: SessionState::Connecting,
        }
    }

    /// Registers the event requests the trace relies on.
    #[tracing::instrument(name = "InstallRequests", skip_all)]
    pub async fn install_requests(&mut self) -> crate::Result<(), S::Error, K::Error> {
        let exclusions = &self.config.exclusions;

        self.session
            .request_exceptions(SuspendPolicy::All)
            .await
            .map_err(DebuggerError)?;

        self.session
            .request_method_entries(exclusions, SuspendPolicy::EventThread)
            .await
            .map_err(DebuggerError)?;

        self.session
            .request_method_exits(exclusions, SuspendPolicy::None)
            .await
            .map_err(DebuggerError)?;

        self.session
            .request_thread_deaths(SuspendPolicy::All)
            .await
            .map_err(DebuggerError)?;

        if let Some(watcher) = &self.watcher {
            watcher
                .arm(&mut self.session)
                .await
                .map_err(DebuggerError)?;
        }

        tracing::info!(
            exclusions = exclusions.len(),
            watch_fields = self.watcher.is_some(),
            "requests installed"
        );

        Ok(())
    }

    /// Resumes the debuggee.
    pub async fn resume(&mut self) -> crate::Result<(), S::Error, K::Error> {
        self.session.resume_all().await.map_err(DebuggerError)?;
        self.state = SessionState::Running;
        Ok(())
    }

    /// Consumes event batches until the debuggee exits or disconnects.
    ///
    /// On success, the final session state is returned as well as the sink.
    #[tracing::instrument(name = "Trace", skip_all, fields(scope = %self.config.scope))]
    pub async fn run(mut self) -> crate::Result<(SessionState, K), S::Error, K::Error> {
        loop {
            let batch = match self.session.next_batch().await.map_err(DebuggerError)? {
                BatchWait::Batch(batch) => batch,
                BatchWait::Interrupted => {
                    tracing::trace!("batch wait interrupted");
                    continue;
                }
                BatchWait::Ended => {
                    self.session_disconnected().await?;
                    break;
                }
            };

            let EventBatch {
                suspend_policy,
                events,
                release,
            } = batch;

            let span = tracing::debug_span!("Batch", policy = ?suspend_policy, len = events.len());

            // the batch must be released whatever happens, or the debuggee
            // stays suspended
            let routed = self.route_batch(events).instrument(span).await;
            let released = self.session.release(release).await.map_err(DebuggerError);

            routed?;
            released?;

            if self.state.is_terminal() {
                break;
            }
        }

        tracing::info!(state = ?self.state, traced_threads = self.ids.last(), "trace ended");

        self.sink.flush().await.map_err(SinkError)?;

        Ok((self.state, self.sink))
    }

    async fn route_batch(
        &mut self,
        events: Vec<DebugEvent<S>>,
    ) -> crate::Result<(), S::Error, K::Error> {
        for event in events {
            self.route_event(event).await?;
        }

        Ok(())
    }

    /// Routes a single event to the trace context of its thread.
    pub async fn route_event(
        &mut self,
        event: DebugEvent<S>,
    ) -> crate::Result<(), S::Error, K::Error> {
        tracing::trace!(kind = event.kind(), "event");

        match event {
            DebugEvent::SessionStarted => self.session_started().await,
            DebugEvent::SessionExited => self.session_exited().await,
            DebugEvent::SessionDisconnected => self.session_disconnected().await,
            DebugEvent::MethodEntered { thread, method } => {
                self.method_entered(thread, method).await
            }
            DebugEvent::MethodExited { thread, method } => self.method_exited(thread, method).await,
            DebugEvent::ExceptionThrown {
                thread,
                exception,
                catch_location,
            } => {
                self.exception_thrown(thread, exception, catch_location)
                    .await
            }
            DebugEvent::FieldModified {
                thread,
                field,
                value,
            } => self.field_modified(thread, field, value).await,
            DebugEvent::ThreadDied { thread } => self.thread_died(thread).await,
            DebugEvent::ClassLoaded { class } => self.class_loaded(class).await,
            DebugEvent::StepCompleted { thread, request } => {
                self.step_completed(thread, request).await
            }
        }
    }

    async fn session_started(&mut self) -> crate::Result<(), S::Error, K::Error> {
        if !self.state.is_terminal() {
            self.state = SessionState::Running;
        }

        self.sink
            .write_notice("-- VM Started --")
            .await
            .map_err(SinkError)?;

        Ok(())
    }

    async fn session_exited(&mut self) -> crate::Result<(), S::Error, K::Error> {
        if self.state.is_terminal() {
            return Ok(());
        }

        self.state = SessionState::ExitedNormally;

        self.sink
            .write_notice("The application exited.")
            .await
            .map_err(SinkError)?;

        Ok(())
    }

    async fn session_disconnected(&mut self) -> crate::Result<(), S::Error, K::Error> {
        // an exited debuggee always ends up disconnected, which is not worth
        // a second message
        if self.state.is_terminal() {
            return Ok(());
        }

        self.state = SessionState::Disconnected;

        self.sink
            .write_notice("The application has been disconnected.")
            .await
            .map_err(SinkError)?;

        Ok(())
    }

    async fn method_entered(
        &mut self,
        thread: S::Thread,
        method: MethodName,
    ) -> crate::Result<(), S::Error, K::Error> {
        let ctx = match self.contexts.entry(thread.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if !self.config.scope.opens(&method) {
                    return Ok(());
                }

                let name = match self.session.thread_name(&thread).await {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!(?thread, error = %e, "failed to fetch thread name");
                        format!("{thread:?}")
                    }
                };

                let ctx = ThreadContext::new(&self.ids, name);

                tracing::info!(tid = ctx.id(), name = ctx.name(), "thread traced");

                ctx.announce(&mut self.sink).await.map_err(SinkError)?;

                entry.insert(ctx)
            }
        };

        if ctx.is_fresh() {
            let frame_count = live_frame_count(&mut self.session, &thread).await;
            ctx.start_tracking(frame_count);
        }

        ctx.method_entered(&mut self.sink, &method)
            .await
            .map_err(SinkError)?;

        Ok(())
    }

    async fn method_exited(
        &mut self,
        thread: S::Thread,
        method: MethodName,
    ) -> crate::Result<(), S::Error, K::Error> {
        let Some(ctx) = self.contexts.get_mut(&thread) else {
            return Ok(());
        };

        let depth = ctx.method_exited();

        if depth == 0
            && self.config.retire == RetirePolicy::OnScopeExit
            && self.config.scope.is_root(&method)
        {
            self.retire(&thread).await?;
        }

        Ok(())
    }

    async fn exception_thrown(
        &mut self,
        thread: S::Thread,
        exception: String,
        catch_location: Option<String>,
    ) -> crate::Result<(), S::Error, K::Error> {
        let Some(ctx) = self.contexts.get_mut(&thread) else {
            return Ok(());
        };

        ctx.exception_thrown(&mut self.sink, &exception, catch_location.as_deref())
            .await
            .map_err(SinkError)?;

        // a thread can only have one step request at a time, the pending
        // one repairs the depth just as well
        if let Some(request) = ctx.pending_step() {
            tracing::debug!(tid = ctx.id(), ?request, "depth repair already pending");
            return Ok(());
        }

        let request = self
            .session
            .request_single_step(&thread, SuspendPolicy::All)
            .await
            .map_err(DebuggerError)?;

        tracing::debug!(tid = ctx.id(), ?request, "depth repair requested");

        ctx.begin_repair(request);
        self.pending_steps.insert(request, thread);

        Ok(())
    }

    async fn step_completed(
        &mut self,
        thread: S::Thread,
        request: S::RequestId,
    ) -> crate::Result<(), S::Error, K::Error> {
        match self.pending_steps.remove(&request) {
            Some(owner) => {
                if owner != thread {
                    tracing::warn!(?owner, ?thread, ?request, "step completed by another thread");
                }

                if let Some(ctx) = self.contexts.get_mut(&owner) {
                    if ctx.pending_step() == Some(request) {
                        match live_frame_count(&mut self.session, &owner).await {
                            Some(frame_count) => {
                                let depth = ctx.repair(frame_count);
                                tracing::debug!(tid = ctx.id(), frame_count, depth, "depth repaired");
                            }
                            None => {
                                ctx.abandon_repair();
                            }
                        }
                    }
                }
            }
            None => tracing::debug!(?thread, ?request, "step completed for an unknown request"),
        }

        // step requests fire once, but are only discarded when cleared
        self.session
            .clear_request(request)
            .await
            .map_err(DebuggerError)?;

        Ok(())
    }

    async fn field_modified(
        &mut self,
        thread: S::Thread,
        field: String,
        value: String,
    ) -> crate::Result<(), S::Error, K::Error> {
        let Some(ctx) = self.contexts.get_mut(&thread) else {
            return Ok(());
        };

        ctx.field_modified(&mut self.sink, &field, &value)
            .await
            .map_err(SinkError)?;

        Ok(())
    }

    async fn class_loaded(&mut self, class: S::Class) -> crate::Result<(), S::Error, K::Error> {
        let Some(watcher) = &self.watcher else {
            tracing::debug!(?class, "class loaded while field watching is disabled");
            return Ok(());
        };

        watcher
            .install(&mut self.session, &class)
            .await
            .map_err(DebuggerError)?;

        Ok(())
    }

    async fn thread_died(&mut self, thread: S::Thread) -> crate::Result<(), S::Error, K::Error> {
        let Some(mut ctx) = self.contexts.remove(&thread) else {
            return Ok(());
        };

        tracing::info!(tid = ctx.id(), name = ctx.name(), "thread died");

        let pending = ctx.died(&mut self.sink).await.map_err(SinkError)?;

        if let Some(request) = pending {
            self.discard_step(request).await?;
        }

        Ok(())
    }

    /// Stops tracing the given thread.
    async fn retire(&mut self, thread: &S::Thread) -> crate::Result<(), S::Error, K::Error> {
        let Some(mut ctx) = self.contexts.remove(thread) else {
            return Ok(());
        };

        tracing::debug!(tid = ctx.id(), name = ctx.name(), "thread retired");

        if let Some(request) = ctx.abandon_repair() {
            self.discard_step(request).await?;
        }

        Ok(())
    }

    async fn discard_step(&mut self, request: S::RequestId) -> crate::Result<(), S::Error, K::Error> {
        self.pending_steps.remove(&request);

        self.session
            .clear_request(request)
            .await
            .map_err(DebuggerError)?;

        Ok(())
    }
}

/// Fetches the live frame count of a thread, logging failures.
async fn live_frame_count<S: DebugSession>(session: &mut S, thread: &S::Thread) -> Option<usize> {
    match session.frame_count(thread).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(?thread, error = %e, "failed to fetch frame count");
            None
        }
    }
}
