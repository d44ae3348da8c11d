use jtrace_tracer::tracer::RetirePolicy;

/// Configuration of a tracing operation.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct TraceConfig {
    /// When a traced thread stops being traced.
    #[knus(child, default, unwrap(argument))]
    pub retire: Retire,

    /// Class patterns excluded from tracing.
    ///
    /// The built-in exclusions are used when none is given.
    #[knus(children(name = "exclude"), unwrap(argument))]
    pub exclusions: Vec<String>,

    /// Whether to trace the field modifications.
    #[knus(child)]
    pub watch_fields: bool,

    /// Maximum time (in milliseconds) to reach the debuggee.
    #[knus(child, default = 5000, unwrap(argument))]
    pub connect_timeout_ms: u64,

    /// Maximum time (in milliseconds) to wait for an event batch before
    /// waiting again.
    #[knus(child, default = 500, unwrap(argument))]
    pub wait_interval_ms: u64,
}

/// When a traced thread stops being traced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, knus::DecodeScalar)]
pub enum Retire {
    /// When the method starting the trace returns.
    #[default]
    OnScopeExit,

    /// Only when the thread dies.
    OnThreadDeath,
}

impl From<Retire> for RetirePolicy {
    fn from(retire: Retire) -> Self {
        match retire {
            Retire::OnScopeExit => Self::OnScopeExit,
            Retire::OnThreadDeath => Self::OnThreadDeath,
        }
    }
}
