mod error;

use std::path::PathBuf;

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

pub use self::error::{Error, Result};
use crate::common::agent::AgentOptions;

/// Finds the JDWP agent options of a running process.
///
/// The agent is searched on the command line of the process first, then in
/// the JVM options environment variables it was started with.
pub async fn agent_options(process_id: u32) -> Result<Option<AgentOptions>> {
    ensure_process_exists(process_id)?;

    let cmdline = read_proc_file(process_id, "cmdline").await?;

    if let Some(options) = AgentOptions::find(nul_separated(&cmdline)) {
        return Ok(Some(options));
    }

    let environ = read_proc_file(process_id, "environ").await?;

    Ok(AgentOptions::find_in_environment(nul_separated(&environ)))
}

fn ensure_process_exists(process_id: u32) -> Result<()> {
    let pid = i32::try_from(process_id).map_err(|_| Error::NoSuchProcess(process_id))?;

    // signal 0 only checks that the process can be reached
    match kill(Pid::from_raw(pid), None::<Signal>) {
        Ok(()) | Err(Errno::EPERM) => Ok(()),
        Err(Errno::ESRCH) => Err(Error::NoSuchProcess(process_id)),
        Err(e) => Err(e.into()),
    }
}

async fn read_proc_file(process_id: u32, name: &str) -> Result<Vec<u8>> {
    let path: PathBuf = format!("/proc/{process_id}/{name}").into();

    tokio::fs::read(&path)
        .await
        .map_err(|e| Error::File(path, e))
}

fn nul_separated(content: &[u8]) -> impl Iterator<Item = &str> {
    content
        .split(|&b| b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| std::str::from_utf8(entry).ok())
}

#[cfg(test)]
mod tests {
    use super::{Error, agent_options, nul_separated};

    #[test]
    fn split_nul_separated() {
        let content = b"java\0-jar\0app.jar\0";
        assert_eq!(nul_separated(content).collect::<Vec<_>>(), ["java", "-jar", "app.jar"]);
    }

    #[tokio::test]
    async fn current_process_has_no_agent() {
        let options = agent_options(std::process::id()).await.expect("agent options");
        assert_eq!(options, None);
    }

    #[tokio::test]
    async fn missing_process() {
        let res = agent_options(i32::MAX as u32).await;
        assert!(matches!(res, Err(Error::NoSuchProcess(_))));
    }
}
