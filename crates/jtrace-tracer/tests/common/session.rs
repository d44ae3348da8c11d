use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use jtrace_tracer::LaunchSpec;
use jtrace_tracer::debugger::{
    BatchWait, Connector, DebugEvent, DebugSession, EventBatch, SuspendPolicy, TransportDescriptor,
};

/// First ID handed out for single-step requests.
pub const FIRST_STEP_REQUEST: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no live frame count scripted for thread {0}")]
    NoFrames(u64),

    #[error("step requests are unsupported")]
    StepUnsupported,

    #[error("no process with ID {0}")]
    NoProcess(u32),
}

/// One scripted outcome of waiting for a batch.
pub enum Step {
    Batch(SuspendPolicy, Vec<DebugEvent<ScriptedSession>>),
    Interrupted,
    Ended,
}

/// Everything the session was asked to do.
#[derive(Debug, Default)]
pub struct Journal {
    /// Batch numbers, in release order.
    pub released: Vec<u32>,

    /// Policies of the released batches.
    pub released_policies: Vec<SuspendPolicy>,

    /// Number of `resume_all` calls.
    pub resumed: usize,

    /// Installed requests, as `(kind, policy)`.
    pub requests: Vec<(&'static str, SuspendPolicy)>,

    /// Single-step requests, as `(thread, request)`.
    pub steps: Vec<(u64, u32)>,

    /// Cleared requests.
    pub cleared: Vec<u32>,

    /// Watched fields.
    pub watched: Vec<String>,

    /// Number of waits for a batch.
    pub waits: usize,
}

/// Builder of a scripted debug session.
#[derive(Default)]
pub struct Script {
    steps: Vec<Step>,
    frames: HashMap<u64, VecDeque<usize>>,
    fields: HashMap<String, Vec<String>>,
    fail_steps: bool,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(mut self, policy: SuspendPolicy, events: Vec<DebugEvent<ScriptedSession>>) -> Self {
        self.steps.push(Step::Batch(policy, events));
        self
    }

    pub fn interrupted(mut self) -> Self {
        self.steps.push(Step::Interrupted);
        self
    }

    pub fn ended(mut self) -> Self {
        self.steps.push(Step::Ended);
        self
    }

    /// Live frame counts returned, in order, for `thread`.
    pub fn frames(mut self, thread: u64, counts: &[usize]) -> Self {
        self.frames.entry(thread).or_default().extend(counts);
        self
    }

    pub fn fields(mut self, class: &str, fields: &[&str]) -> Self {
        self.fields.insert(
            class.to_owned(),
            fields.iter().map(|&f| f.to_owned()).collect(),
        );
        self
    }

    pub fn failing_steps(mut self) -> Self {
        self.fail_steps = true;
        self
    }

    pub fn into_session(self) -> (ScriptedSession, Arc<Mutex<Journal>>) {
        let journal = Arc::new(Mutex::new(Journal::default()));

        let session = ScriptedSession {
            steps: self.steps.into(),
            frames: self.frames,
            fields: self.fields,
            fail_steps: self.fail_steps,
            next_batch: 0,
            next_request: 1,
            next_step: FIRST_STEP_REQUEST,
            journal: journal.clone(),
        };

        (session, journal)
    }
}

/// Debug session replaying a script of event batches.
///
/// Threads are plain numbers named `thread-<n>`, and the release handle of
/// a batch is its number (starting at 1).
pub struct ScriptedSession {
    steps: VecDeque<Step>,
    frames: HashMap<u64, VecDeque<usize>>,
    fields: HashMap<String, Vec<String>>,
    fail_steps: bool,
    next_batch: u32,
    next_request: u32,
    next_step: u32,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedSession {
    fn record<T>(&self, f: impl FnOnce(&mut Journal) -> T) -> T {
        f(&mut self.journal.lock().unwrap())
    }

    fn request(&mut self, kind: &'static str, policy: SuspendPolicy) -> u32 {
        self.record(|j| j.requests.push((kind, policy)));
        self.next_request += 1;
        self.next_request - 1
    }
}

impl DebugSession for ScriptedSession {
    type Thread = u64;
    type Class = String;
    type Field = String;
    type RequestId = u32;
    type Release = (u32, SuspendPolicy);
    type Error = Error;

    async fn next_batch(&mut self) -> Result<BatchWait<Self>, Self::Error> {
        self.record(|j| j.waits += 1);

        let wait = match self.steps.pop_front() {
            Some(Step::Batch(suspend_policy, events)) => {
                self.next_batch += 1;

                BatchWait::Batch(EventBatch {
                    suspend_policy,
                    events,
                    release: (self.next_batch, suspend_policy),
                })
            }
            Some(Step::Interrupted) => BatchWait::Interrupted,
            Some(Step::Ended) | None => BatchWait::Ended,
        };

        Ok(wait)
    }

    async fn release(&mut self, (batch, policy): Self::Release) -> Result<(), Self::Error> {
        self.record(|j| {
            j.released.push(batch);
            j.released_policies.push(policy);
        });
        Ok(())
    }

    async fn resume_all(&mut self) -> Result<(), Self::Error> {
        self.record(|j| j.resumed += 1);
        Ok(())
    }

    async fn thread_name(&mut self, thread: &Self::Thread) -> Result<String, Self::Error> {
        Ok(format!("thread-{thread}"))
    }

    async fn frame_count(&mut self, thread: &Self::Thread) -> Result<usize, Self::Error> {
        self.frames
            .get_mut(thread)
            .and_then(VecDeque::pop_front)
            .ok_or(Error::NoFrames(*thread))
    }

    async fn declared_fields(&mut self, class: &Self::Class) -> Result<Vec<Self::Field>, Self::Error> {
        Ok(self.fields.get(class).cloned().unwrap_or_default())
    }

    async fn request_exceptions(&mut self, policy: SuspendPolicy) -> Result<u32, Self::Error> {
        Ok(self.request("exception", policy))
    }

    async fn request_method_entries(
        &mut self,
        _exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<u32, Self::Error> {
        Ok(self.request("method-entry", policy))
    }

    async fn request_method_exits(
        &mut self,
        _exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<u32, Self::Error> {
        Ok(self.request("method-exit", policy))
    }

    async fn request_thread_deaths(&mut self, policy: SuspendPolicy) -> Result<u32, Self::Error> {
        Ok(self.request("thread-death", policy))
    }

    async fn request_class_prepares(
        &mut self,
        _exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<u32, Self::Error> {
        Ok(self.request("class-prepare", policy))
    }

    async fn watch_field_modification(
        &mut self,
        field: &Self::Field,
        _exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<u32, Self::Error> {
        self.record(|j| j.watched.push(field.clone()));
        Ok(self.request("field-modification", policy))
    }

    async fn request_single_step(
        &mut self,
        thread: &Self::Thread,
        _policy: SuspendPolicy,
    ) -> Result<u32, Self::Error> {
        if self.fail_steps {
            return Err(Error::StepUnsupported);
        }

        let request = self.next_step;
        self.next_step += 1;

        self.record(|j| j.steps.push((*thread, request)));

        Ok(request)
    }

    async fn clear_request(&mut self, request: u32) -> Result<(), Self::Error> {
        self.record(|j| j.cleared.push(request));
        Ok(())
    }
}

/// Connector handing out a single scripted session.
pub struct ScriptedConnector {
    session: Option<ScriptedSession>,
    process_id: u32,
}

impl ScriptedConnector {
    pub fn new(session: ScriptedSession, process_id: u32) -> Self {
        Self {
            session: Some(session),
            process_id,
        }
    }
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;
    type Error = Error;

    async fn attach(&mut self, process_id: u32) -> Result<Self::Session, Self::Error> {
        match self.session.take() {
            Some(session) if process_id == self.process_id => Ok(session),
            _ => Err(Error::NoProcess(process_id)),
        }
    }

    async fn launch(&mut self, _spec: LaunchSpec) -> Result<Self::Session, Self::Error> {
        self.session.take().ok_or(Error::NoProcess(0))
    }

    fn transports(&self) -> Vec<TransportDescriptor> {
        vec![TransportDescriptor {
            name: "scripted".to_owned(),
            transport: "memory".to_owned(),
            description: "Replays a scripted session".to_owned(),
        }]
    }
}
