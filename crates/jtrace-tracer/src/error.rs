/// Debugger error.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct DebuggerError<E>(pub E);

/// Trace sink error.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct SinkError<E>(pub E);

/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error<E1, E2> {
    /// A debugger error occurred.
    #[error(transparent)]
    Debugger(#[from] DebuggerError<E1>),

    /// A trace sink error occurred.
    #[error(transparent)]
    Sink(#[from] SinkError<E2>),
}

/// Result type of this crate.
pub type Result<T, E1, E2> = core::result::Result<T, Error<E1, E2>>;
