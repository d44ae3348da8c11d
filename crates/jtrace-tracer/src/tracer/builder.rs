use super::{DEFAULT_EXCLUSIONS, RetirePolicy, TraceConfig, TraceScope, Tracer};
use crate::debugger::{Connector, MethodName};
use crate::sink::TraceSink;

/// Builder for [Tracer].
///
/// It is usually created by calling [Tracer::builder], and allows to
/// specify which connector and sink to use for tracing a process, as well
/// as which threads to trace.
pub struct Builder<S> {
    state: S,
}

impl Builder<NeedsConnector> {
    pub(super) const fn new() -> Self {
        Self {
            state: NeedsConnector,
        }
    }

    /// Specifies the connector to use for reaching the process to trace.
    pub const fn with_connector<C: Connector>(self, connector: C) -> Builder<NeedsSink<C>> {
        Builder {
            state: NeedsSink { connector },
        }
    }
}

impl<C: Connector> Builder<NeedsSink<C>> {
    /// Specifies the destination of the trace lines.
    pub fn with_sink<K: TraceSink>(self, sink: K) -> Builder<NeedsScope<C, K>> {
        Builder {
            state: NeedsScope {
                connector: self.state.connector,
                sink,
            },
        }
    }
}

impl<C, K> Builder<NeedsScope<C, K>> {
    /// Specifies to trace **every** thread, starting from its first method
    /// entry.
    ///
    /// Threads are only retired when they die.
    pub fn trace_all(self) -> Builder<ReadyToBuild<C, K>> {
        self.with_scope(TraceScope::All)
    }

    /// Specifies to trace a thread only once it enters the given method.
    ///
    /// - `class` is the fully qualified name of the class declaring the
    ///   method (e.g., `com.example.Main`).
    /// - `method` is the name of the method.
    pub fn trace_method(
        self,
        class: impl Into<String>,
        method: impl Into<String>,
    ) -> Builder<ReadyToBuild<C, K>> {
        self.with_scope(TraceScope::Method(MethodName::new(class, method)))
    }

    fn with_scope(self, scope: TraceScope) -> Builder<ReadyToBuild<C, K>> {
        Builder {
            state: ReadyToBuild {
                connector: self.state.connector,
                sink: self.state.sink,
                config: TraceConfig {
                    scope,
                    retire: RetirePolicy::default(),
                    exclusions: DEFAULT_EXCLUSIONS.iter().map(|&p| p.to_owned()).collect(),
                    watch_fields: false,
                },
            },
        }
    }
}

impl<C, K> Builder<ReadyToBuild<C, K>> {
    /// Specifies when a traced thread stops being traced.
    ///
    /// This only matters when [tracing a method](Builder::trace_method).
    pub fn retire_on(mut self, policy: RetirePolicy) -> Self {
        self.state.config.retire = policy;
        self
    }

    /// Replaces the class patterns excluded from tracing (e.g., `java.*`).
    pub fn exclusions<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.state.config.exclusions = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Specifies whether the modifications of fields declared by loaded
    /// classes are traced.
    ///
    /// # Warning
    ///
    /// Every field of every non-excluded class gets watched, which slows the
    /// traced process down.
    pub fn watch_fields(mut self, enable: bool) -> Self {
        self.state.config.watch_fields = enable;
        self
    }

    /// Builds the tracer.
    pub fn build(self) -> Tracer<C, K> {
        Tracer {
            connector: self.state.connector,
            sink: self.state.sink,
            config: self.state.config,
        }
    }
}

pub struct NeedsConnector;

pub struct NeedsSink<C> {
    connector: C,
}

pub struct NeedsScope<C, K> {
    connector: C,
    sink: K,
}

pub struct ReadyToBuild<C, K> {
    connector: C,
    sink: K,
    config: TraceConfig,
}
