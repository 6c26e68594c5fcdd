use tracing::info;

/// Receives coarse progress milestones from fetchers and resolvers.
///
/// Purely observational: implementations must not block and cannot push
/// back on the caller.
pub trait ProgressSink {
    fn report(&self, message: &str, percent: Option<u8>);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, Option<u8>),
{
    fn report(&self, message: &str, percent: Option<u8>) {
        self(message, percent);
    }
}

/// Forwards milestones to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, message: &str, percent: Option<u8>) {
        match percent {
            Some(percent) => info!(percent, "{message}"),
            None => info!("{message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn report(&self, _message: &str, _percent: Option<u8>) {}
}

/// `round(done / total * 100)`, clamped to 100. An empty total counts as done.
#[must_use]
pub fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let scaled = done.saturating_mul(100).saturating_add(total / 2) / total;
    u8::try_from(scaled.min(100)).unwrap_or(100)
}
