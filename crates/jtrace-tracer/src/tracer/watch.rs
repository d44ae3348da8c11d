use crate::debugger::{DebugSession, SuspendPolicy};

/// Installer of field modification watches on newly loaded classes.
pub struct FieldWatchInstaller {
    /// Class patterns excluded from the watches.
    exclusions: Vec<String>,
}

impl FieldWatchInstaller {
    /// Creates an installer excluding classes matching `exclusions`.
    pub const fn new(exclusions: Vec<String>) -> Self {
        Self { exclusions }
    }

    /// Registers interest in prepared classes, so that [install](Self::install)
    /// gets called for each of them.
    pub async fn arm<S: DebugSession>(&self, session: &mut S) -> Result<S::RequestId, S::Error> {
        session
            .request_class_prepares(&self.exclusions, SuspendPolicy::All)
            .await
    }

    /// Watches every field declared by `class`.
    ///
    /// Watches never suspend the debuggee. It returns the number of installed
    /// watches.
    #[tracing::instrument(name = "WatchFields", skip_all, fields(class = ?class))]
    pub async fn install<S: DebugSession>(
        &self,
        session: &mut S,
        class: &S::Class,
    ) -> Result<usize, S::Error> {
        let fields = session.declared_fields(class).await?;

        for field in fields.iter() {
            session
                .watch_field_modification(field, &self.exclusions, SuspendPolicy::None)
                .await?;
        }

        if !fields.is_empty() {
            tracing::debug!(count = fields.len(), "field watches installed");
        }

        Ok(fields.len())
    }
}
