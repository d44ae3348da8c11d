use std::sync::atomic::{AtomicU64, Ordering};

use crate::debugger::MethodName;
use crate::sink::TraceSink;

/// Allocator of the IDs marking every line of a traced thread.
///
/// IDs start at 1, are strictly increasing and never reused.
#[derive(Debug, Default)]
pub struct ThreadIdAllocator {
    last: AtomicU64,
}

impl ThreadIdAllocator {
    /// Creates an allocator whose first ID is 1.
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Allocates a new thread ID.
    pub fn allocate(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns the last allocated ID (0 if none was allocated).
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

/// Depth tracking state of a traced thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState<R> {
    /// No method entry was seen yet.
    Fresh,

    /// Depth follows method entries and exits.
    Tracking,

    /// An exception was thrown, the depth will be recomputed from the live
    /// call stack once `request` fires.
    Repairing {
        /// Single-shot step request that triggers the repair.
        request: R,
    },

    /// The thread has died.
    Dead,
}

/// Trace state of a single debuggee thread.
#[derive(Debug)]
pub struct ThreadContext<R> {
    id: u64,
    name: String,
    depth: usize,
    /// Number of frames below the first traced frame.
    baseline: usize,
    state: ContextState<R>,
}

impl<R: Copy + PartialEq> ThreadContext<R> {
    /// Creates the context of a newly observed thread.
    pub fn new(ids: &ThreadIdAllocator, name: impl Into<String>) -> Self {
        Self {
            id: ids.allocate(),
            name: name.into(),
            depth: 0,
            baseline: 0,
            state: ContextState::Fresh,
        }
    }

    /// ID marking the lines of this thread.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Name of the thread.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current call depth.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Frame count recorded when tracking started, minus the first traced
    /// frame.
    pub const fn baseline(&self) -> usize {
        self.baseline
    }

    /// Current depth tracking state.
    pub fn state(&self) -> ContextState<R> {
        self.state
    }

    /// Returns whether no method entry was seen yet.
    pub fn is_fresh(&self) -> bool {
        matches!(self.state, ContextState::Fresh)
    }

    /// Returns the pending step request, if the context is repairing.
    pub fn pending_step(&self) -> Option<R> {
        match self.state {
            ContextState::Repairing { request } => Some(request),
            _ => None,
        }
    }

    /// Prints the new thread marker.
    pub async fn announce<K: TraceSink>(&self, sink: &mut K) -> Result<(), K::Error> {
        let text = format!("*** New Thread :'{}' ***", self.name);
        sink.write_line(self.id, self.depth, &text).await
    }

    /// Starts tracking the depth.
    ///
    /// `frame_count` is the live frame count of the thread on its first
    /// traced method entry (that frame included), if it could be fetched.
    pub fn start_tracking(&mut self, frame_count: Option<usize>) {
        if let ContextState::Fresh = self.state {
            self.baseline = frame_count.map_or(0, |count| count.saturating_sub(1));
            self.state = ContextState::Tracking;
        }
    }

    /// Handles a method entry.
    pub async fn method_entered<K: TraceSink>(
        &mut self,
        sink: &mut K,
        method: &MethodName,
    ) -> Result<(), K::Error> {
        sink.write_line(self.id, self.depth, &format!("{method}()"))
            .await?;

        self.depth = self.depth.saturating_add(1);

        Ok(())
    }

    /// Handles a method exit.
    ///
    /// It returns the new depth.
    pub fn method_exited(&mut self) -> usize {
        self.depth = self.depth.saturating_sub(1);
        self.depth
    }

    /// Prints a thrown exception and where it will be caught.
    pub async fn exception_thrown<K: TraceSink>(
        &mut self,
        sink: &mut K,
        exception: &str,
        catch_location: Option<&str>,
    ) -> Result<(), K::Error> {
        sink.write_line(self.id, self.depth, &format!("Exception: {exception}"))
            .await?;

        let caught = catch_location.unwrap_or("<uncaught>");
        sink.write_line(self.id, self.depth, &format!("Caught: {caught}"))
            .await
    }

    /// Waits for `request` to fire before recomputing the depth.
    pub fn begin_repair(&mut self, request: R) {
        self.state = ContextState::Repairing { request };
    }

    /// Recomputes the depth from the live frame count of the thread.
    ///
    /// It returns the new depth.
    pub fn repair(&mut self, frame_count: usize) -> usize {
        self.depth = frame_count.saturating_sub(self.baseline);

        if let ContextState::Repairing { .. } = self.state {
            self.state = ContextState::Tracking;
        }

        self.depth
    }

    /// Goes back to tracking without repairing the depth.
    ///
    /// It returns the step request that was pending, if any.
    pub fn abandon_repair(&mut self) -> Option<R> {
        let request = self.pending_step();

        if request.is_some() {
            self.state = ContextState::Tracking;
        }

        request
    }

    /// Prints a watched field modification.
    pub async fn field_modified<K: TraceSink>(
        &mut self,
        sink: &mut K,
        field: &str,
        value: &str,
    ) -> Result<(), K::Error> {
        sink.write_line(self.id, self.depth, &format!("    {field} = {value}"))
            .await
    }

    /// Handles the death of the thread.
    ///
    /// It returns the step request that was pending, if any.
    pub async fn died<K: TraceSink>(&mut self, sink: &mut K) -> Result<Option<R>, K::Error> {
        let request = self.pending_step();

        self.depth = 0;
        self.state = ContextState::Dead;

        let text = format!("*** Dead Thread :'{}' ***", self.name);
        sink.write_line(self.id, self.depth, &text).await?;

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextState, ThreadContext, ThreadIdAllocator};
    use crate::debugger::MethodName;
    use crate::sink::TextSink;

    fn output(sink: TextSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).expect("utf8")
    }

    #[test]
    fn allocated_ids_are_increasing() {
        let ids = ThreadIdAllocator::new();

        assert_eq!(ids.last(), 0);
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.allocate(), 2);
        assert_eq!(ids.allocate(), 3);
        assert_eq!(ids.last(), 3);
    }

    #[tokio::test]
    async fn depth_follows_entries_and_exits() {
        let ids = ThreadIdAllocator::new();
        let mut sink = TextSink::new(Vec::new());
        let mut ctx = ThreadContext::<u32>::new(&ids, "main");

        ctx.start_tracking(Some(1));
        assert_eq!(ctx.state(), ContextState::Tracking);
        assert_eq!(ctx.baseline(), 0);

        let a = MethodName::new("Foo", "a");
        let b = MethodName::new("Foo", "b");

        ctx.method_entered(&mut sink, &a).await.expect("method entry");
        assert_eq!(ctx.depth(), 1);
        ctx.method_entered(&mut sink, &b).await.expect("method entry");
        assert_eq!(ctx.depth(), 2);
        assert_eq!(ctx.method_exited(), 1);
        assert_eq!(ctx.method_exited(), 0);
        assert_eq!(ctx.method_exited(), 0);

        assert_eq!(output(sink), "  1 +-Foo.a()\n  1 | +-Foo.b()\n");
    }

    #[test]
    fn baseline_excludes_first_frame() {
        let ids = ThreadIdAllocator::new();

        let mut ctx = ThreadContext::<u32>::new(&ids, "main");
        ctx.start_tracking(Some(5));
        assert_eq!(ctx.baseline(), 4);

        // the baseline is captured once
        ctx.start_tracking(Some(9));
        assert_eq!(ctx.baseline(), 4);

        let mut ctx = ThreadContext::<u32>::new(&ids, "other");
        ctx.start_tracking(None);
        assert_eq!(ctx.baseline(), 0);
    }

    #[test]
    fn repair_is_idempotent() {
        let ids = ThreadIdAllocator::new();
        let mut ctx = ThreadContext::<u32>::new(&ids, "main");

        ctx.start_tracking(Some(3));
        ctx.begin_repair(7);
        assert_eq!(ctx.pending_step(), Some(7));

        assert_eq!(ctx.repair(6), 4);
        assert_eq!(ctx.state(), ContextState::Tracking);
        assert_eq!(ctx.repair(6), 4);

        // fewer frames than the baseline
        assert_eq!(ctx.repair(1), 0);
    }

    #[test]
    fn abandon_repair() {
        let ids = ThreadIdAllocator::new();
        let mut ctx = ThreadContext::<u32>::new(&ids, "main");

        ctx.start_tracking(Some(1));
        assert_eq!(ctx.abandon_repair(), None);

        ctx.begin_repair(3);
        assert_eq!(ctx.abandon_repair(), Some(3));
        assert_eq!(ctx.state(), ContextState::Tracking);
    }

    #[tokio::test]
    async fn death_clears_indentation() {
        let ids = ThreadIdAllocator::new();
        let mut sink = TextSink::new(Vec::new());
        let mut ctx = ThreadContext::<u32>::new(&ids, "worker");

        ctx.start_tracking(Some(1));
        ctx.method_entered(&mut sink, &MethodName::new("Foo", "a"))
            .await
            .expect("method entry");
        ctx.begin_repair(2);

        assert_eq!(ctx.died(&mut sink).await.expect("death"), Some(2));
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.state(), ContextState::Dead);

        assert_eq!(
            output(sink),
            "  1 +-Foo.a()\n  1 +-*** Dead Thread :'worker' ***\n"
        );
    }

    #[tokio::test]
    async fn exception_and_field_lines() {
        let ids = ThreadIdAllocator::new();
        let mut sink = TextSink::new(Vec::new());
        let mut ctx = ThreadContext::<u32>::new(&ids, "main");

        ctx.start_tracking(Some(1));
        ctx.method_entered(&mut sink, &MethodName::new("Foo", "a"))
            .await
            .expect("method entry");
        ctx.exception_thrown(&mut sink, "instance of java.lang.Error(id=1)", None)
            .await
            .expect("exception");
        ctx.field_modified(&mut sink, "count", "3").await.expect("field modification");

        assert_eq!(
            output(sink),
            concat!(
                "  1 +-Foo.a()\n",
                "  1 | +-Exception: instance of java.lang.Error(id=1)\n",
                "  1 | +-Caught: <uncaught>\n",
                "  1 | +-    count = 3\n",
            )
        );
    }
}
