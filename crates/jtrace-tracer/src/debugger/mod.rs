mod event;

use std::fmt;
use std::future::Future;
use std::hash::Hash;

pub use self::event::{BatchWait, DebugEvent, EventBatch, MethodName, SuspendPolicy};
use crate::LaunchSpec;

/// Trait implementing the connection logic of a debugger.
pub trait Connector {
    /// Debugging session returned by this connector.
    type Session: DebugSession<Error: Into<Self::Error>>;

    /// Error returned by this trait.
    type Error;

    /// Attaches to the running process with the given ID.
    fn attach(
        &mut self,
        process_id: u32,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>>;

    /// Launches a process with the given launch specification and connects
    /// to it.
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>>;

    /// Lists the transports this connector is able to use.
    fn transports(&self) -> Vec<TransportDescriptor>;
}

/// Description of a connection transport offered by a [Connector].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportDescriptor {
    /// Name of the connector using the transport.
    pub name: String,

    /// Name of the underlying transport.
    pub transport: String,

    /// Human-readable description.
    pub description: String,
}

/// Trait implementing the instrumentation logic of a debugger.
pub trait DebugSession {
    /// Handle of a debuggee's thread.
    type Thread: Clone + Eq + Hash + fmt::Debug;

    /// Handle of a class loaded by the debuggee.
    type Class: fmt::Debug;

    /// Handle of a field declared by a class.
    type Field: fmt::Debug;

    /// Identifier of an event request registered in the debuggee.
    type RequestId: Copy + Eq + Hash + fmt::Debug;

    /// Handle needed to release an event batch.
    type Release;

    /// Error returned by this trait.
    type Error: std::error::Error;

    /// Waits for the next batch of events generated by the debuggee.
    fn next_batch(&mut self) -> impl Future<Output = Result<BatchWait<Self>, Self::Error>>;

    /// Releases a fully handled batch, resuming whatever the batch's suspend
    /// policy suspended.
    fn release(&mut self, release: Self::Release) -> impl Future<Output = Result<(), Self::Error>>;

    /// Resumes every thread of the debuggee.
    fn resume_all(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Returns the name of the given thread.
    fn thread_name(
        &mut self,
        thread: &Self::Thread,
    ) -> impl Future<Output = Result<String, Self::Error>>;

    /// Returns the number of live frames on the call stack of the given
    /// (suspended) thread.
    fn frame_count(
        &mut self,
        thread: &Self::Thread,
    ) -> impl Future<Output = Result<usize, Self::Error>>;

    /// Returns the fields declared by the given class.
    fn declared_fields(
        &mut self,
        class: &Self::Class,
    ) -> impl Future<Output = Result<Vec<Self::Field>, Self::Error>>;

    /// Requests to be notified of every thrown exception, caught or not.
    fn request_exceptions(
        &mut self,
        policy: SuspendPolicy,
    ) -> impl Future<Output = Result<Self::RequestId, Self::Error>>;

    /// Requests to be notified of method entries, except within classes
    /// matching one of the `exclusions` patterns (e.g., `java.*`).
    fn request_method_entries(
        &mut self,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> impl Future<Output = Result<Self::RequestId, Self::Error>>;

    /// Requests to be notified of method exits, except within classes
    /// matching one of the `exclusions` patterns.
    fn request_method_exits(
        &mut self,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> impl Future<Output = Result<Self::RequestId, Self::Error>>;

    /// Requests to be notified of thread deaths.
    fn request_thread_deaths(
        &mut self,
        policy: SuspendPolicy,
    ) -> impl Future<Output = Result<Self::RequestId, Self::Error>>;

    /// Requests to be notified of prepared classes, except classes matching
    /// one of the `exclusions` patterns.
    fn request_class_prepares(
        &mut self,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> impl Future<Output = Result<Self::RequestId, Self::Error>>;

    /// Requests to be notified of modifications of the given field, except
    /// modifications made from classes matching one of the `exclusions`
    /// patterns.
    fn watch_field_modification(
        &mut self,
        field: &Self::Field,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> impl Future<Output = Result<Self::RequestId, Self::Error>>;

    /// Requests a single step of the given thread, firing once.
    ///
    /// # Note
    ///
    /// The request must be cleared with [clear_request](Self::clear_request)
    /// once its event was delivered.
    fn request_single_step(
        &mut self,
        thread: &Self::Thread,
        policy: SuspendPolicy,
    ) -> impl Future<Output = Result<Self::RequestId, Self::Error>>;

    /// Clears a previously registered event request.
    fn clear_request(
        &mut self,
        request: Self::RequestId,
    ) -> impl Future<Output = Result<(), Self::Error>>;
}
