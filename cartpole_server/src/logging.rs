use slog::{Drain, Logger};
use std::panic::UnwindSafe;

pub use slog::Discard;

/// Asynchronous terminal drain on stderr, leaving stdout to the renderer.
///
/// Records still queued are written when the guard is dropped, so keep it
/// alive until the last record has been logged.
pub fn terminal() -> (slog::Fuse<slog_async::Async>, slog_async::AsyncGuard) {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();

    let (drain, guard) = slog_async::Async::new(drain).build_with_guard();
    (drain.fuse(), guard)
}

pub fn root<D>(drain: D) -> Logger
where D: slog::SendSyncRefUnwindSafeDrain<Ok = (), Err = slog::Never> + UnwindSafe + 'static {
    Logger::root(drain, o!("app" => "cartpole"))
}

/// Logger that drops everything.
pub fn discard() -> Logger { Logger::root(Discard, o!()) }
