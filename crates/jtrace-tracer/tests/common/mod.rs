mod session;

pub use self::session::{Journal, Script, ScriptedConnector, ScriptedSession};
