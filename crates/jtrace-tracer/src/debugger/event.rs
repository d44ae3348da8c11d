use std::fmt;

use super::DebugSession;

/// Whether delivering an event batch froze the debuggee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuspendPolicy {
    /// No thread was suspended.
    None,

    /// Only the thread that generated the events was suspended.
    EventThread,

    /// Every thread of the debuggee was suspended.
    All,
}

impl SuspendPolicy {
    /// Returns whether a batch delivered under this policy must be released
    /// for the debuggee to make progress.
    pub const fn suspends(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Outcome of waiting for the next event batch.
pub enum BatchWait<S: DebugSession + ?Sized> {
    /// A batch of simultaneous events was delivered.
    Batch(EventBatch<S>),

    /// The wait was interrupted before any batch arrived.
    ///
    /// The caller is expected to wait again.
    Interrupted,

    /// The event source is closed: the debuggee is gone or the link to it was
    /// lost.
    Ended,
}

/// Group of simultaneous events delivered by the debuggee.
pub struct EventBatch<S: DebugSession + ?Sized> {
    /// Suspend policy applied by the debuggee while delivering this batch.
    pub suspend_policy: SuspendPolicy,

    /// Events of the batch, in delivery order.
    pub events: Vec<DebugEvent<S>>,

    /// Handle to give back to [DebugSession::release] once every event of
    /// the batch was handled.
    pub release: S::Release,
}

/// Event describing some action taking place within the debuggee.
pub enum DebugEvent<S: DebugSession + ?Sized> {
    /// The debuggee has started.
    SessionStarted,

    /// The debuggee has exited.
    SessionExited,

    /// The link to the debuggee was closed.
    SessionDisconnected,

    /// A thread has entered a method.
    MethodEntered {
        /// Thread entering the method.
        thread: S::Thread,

        /// Entered method.
        method: MethodName,
    },

    /// A thread is about to return from a method.
    MethodExited {
        /// Thread leaving the method.
        thread: S::Thread,

        /// Method being left.
        method: MethodName,
    },

    /// A thread has thrown an exception.
    ExceptionThrown {
        /// Thread throwing the exception.
        thread: S::Thread,

        /// Human-readable description of the thrown exception.
        exception: String,

        /// Location where the exception will be caught, if any.
        catch_location: Option<String>,
    },

    /// A watched field is about to be modified.
    FieldModified {
        /// Thread modifying the field.
        thread: S::Thread,

        /// Name of the field.
        field: String,

        /// Human-readable representation of the value being stored.
        value: String,
    },

    /// A thread has died.
    ThreadDied {
        /// Dead thread.
        thread: S::Thread,
    },

    /// A class was loaded and prepared by the debuggee.
    ClassLoaded {
        /// The prepared class.
        class: S::Class,
    },

    /// A single-shot step request has fired.
    StepCompleted {
        /// Thread that performed the step.
        thread: S::Thread,

        /// Step request that fired.
        request: S::RequestId,
    },
}

impl<S: DebugSession + ?Sized> DebugEvent<S> {
    /// Short name of the event kind, used for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted => "session-started",
            Self::SessionExited => "session-exited",
            Self::SessionDisconnected => "session-disconnected",
            Self::MethodEntered { .. } => "method-entered",
            Self::MethodExited { .. } => "method-exited",
            Self::ExceptionThrown { .. } => "exception-thrown",
            Self::FieldModified { .. } => "field-modified",
            Self::ThreadDied { .. } => "thread-died",
            Self::ClassLoaded { .. } => "class-loaded",
            Self::StepCompleted { .. } => "step-completed",
        }
    }
}

/// Fully qualified name of a method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodName {
    /// Fully qualified name of the declaring class (e.g., `java.lang.Thread`).
    pub class: String,

    /// Name of the method.
    pub name: String,
}

impl MethodName {
    /// Creates a method name from its declaring class and its name.
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.name)
    }
}
