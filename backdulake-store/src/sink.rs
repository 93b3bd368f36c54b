//! Change notification.

/// Receives a notification after every state-mutating store operation.
///
/// Fire-and-forget: the sink gets no arguments and returns nothing. Bound
/// views read the new state back from the store.
pub trait ChangeSink: Send + Sync {
    fn emit_change(&self);
}

impl<F> ChangeSink for F
where
    F: Fn() + Send + Sync,
{
    fn emit_change(&self) {
        self()
    }
}

/// A sink that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ChangeSink for NoopSink {
    fn emit_change(&self) {}
}
