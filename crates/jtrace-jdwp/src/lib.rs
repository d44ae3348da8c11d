//! This crate provides a default implementation of a debugger (to be used with
//! `jtrace-tracer`), speaking the Java Debug Wire Protocol (JDWP) over
//! sockets.
//!
//! The debugger is able to:
//! - attach to a running JVM (on the **same host machine**) by process ID,
//!   provided the JVM was started with a listening socket JDWP agent (e.g.,
//!   `-agentlib:jdwp=transport=dt_socket,server=y,address=5005`).
//! - launch a JVM from a raw command line, and accept the connection of its
//!   JDWP agent (e.g., `-agentlib:jdwp=transport=dt_socket,server=n,address=5005`).
//!
//! <div class="warning">
//!
//! *This crate is not meant to be used on its own! It merely implements the
//! interface (traits) provided by `jtrace-tracer`, so that the debugger can
//! be used by that crate for tracing processes.*
//!
//! </div>
//!
//! # Supported Platforms
//!
//! Attaching by process ID relies on `procfs`, and is only supported on
//! **Linux**.

mod common;
mod error;
mod protocol;
mod sys;

pub use self::common::agent::AgentError;
pub use self::common::connector::{ConnectOptions, JdwpConnector};
pub use self::common::session::{ClassRef, FieldRef, JdwpSession, Release, RequestId, ThreadRef};
pub use self::error::{Error, Result};
pub use self::protocol::ProtocolError;
