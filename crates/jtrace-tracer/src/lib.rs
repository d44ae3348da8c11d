//! This crate allows to attach to a JVM-like debuggee and trace its
//! execution as an indented, human-readable call trace.
//!
//! Three main components are provided:
//! - An event dispatcher consuming the batches of execution events
//!   generated by the debuggee (method entries and exits, exceptions, field
//!   modifications, thread deaths), and keeping a call depth per traced
//!   thread.
//! - A trait to implement a custom trace sink, receiving one line per traced
//!   event.
//! - A few traits to implement a custom debugger, responsible for connecting
//!   to a debuggee and instrumenting it.
//!
//! # Tracing a method
//!
//! ```no_run
//! use jtrace_jdwp::JdwpConnector;
//!
//! use jtrace_tracer::sink::TextSink;
//! use jtrace_tracer::tracer::Tracer;
//!
//! #[tokio::main]
//! async fn main() {
//!     // initialize the tracer
//!     let tracer = Tracer::builder()
//!         .with_connector(JdwpConnector::default())
//!         .with_sink(TextSink::new(tokio::io::stdout()))
//!         .trace_method("com.example.Main", "run")
//!         .build();
//!
//!     // attach to the process to trace
//!     let session = tracer.attach(4242).await.unwrap();
//!
//!     // trace until the process exits or disconnects
//!     let (state, _) = session.resume_and_trace().await.unwrap();
//! }
//! ```
//!
//! # Call depth and exceptions
//!
//! The call depth of a thread is incremented on method entries and
//! decremented on method exits. An exception unwinding the stack may pop
//! frames without any exit notification, so after each thrown exception the
//! dispatcher requests a single step of the thread and recomputes the depth
//! from its live frame count once the step completes.
//!
//! # Implementing a custom debugger
//!
//! The [Connector](self::debugger::Connector)/[DebugSession](self::debugger::DebugSession)
//! traits allow to implement the debugging logic used for tracing a process.
//! The default implementation, speaking JDWP over a socket, is provided by
//! `jtrace-jdwp`.

/// Module containing traits for implementing a custom debugger.
pub mod debugger;

mod error;
mod launch;

/// Module containing the trace sink trait and its plain-text implementation.
pub mod sink;

/// Module implementing the process tracer.
pub mod tracer;

pub use self::error::{DebuggerError, Error, Result, SinkError};
pub use self::launch::{LaunchSpec, LaunchSpecError};
