#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// File open/read error.
    #[error("{0}: {1}")]
    File(std::path::PathBuf, std::io::Error),

    #[error("no process with ID {0}")]
    NoSuchProcess(u32),

    #[error("os error: {0}")]
    Os(#[from] nix::Error),
}

/// Result type of this module.
pub type Result<T> = core::result::Result<T, Error>;
