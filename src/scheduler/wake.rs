/// One-shot "wake the host loop" capability.
///
/// Called by the scheduler after every enqueue. The host answers each wake
/// with one `drain_available_work` call on the UI thread. Implementations
/// must not block.
pub trait WakeSignal: Send + Sync {
    fn request_wake(&self);
}

impl<F> WakeSignal for F
where
    F: Fn() + Send + Sync,
{
    fn request_wake(&self) {
        self()
    }
}
