//! Crash trail for panics.
//!
//! [`with_crash_reporting`] runs a closure and, if it panics, writes the panic
//! payload and the backtrace captured at the panic site to the logger at
//! `Critical` severity before resuming the unwind. The panic is never
//! swallowed: the caller sees exactly the failure it would have seen without
//! the guard.

use std::{
    any::Any,
    backtrace::Backtrace,
    cell::{Cell, RefCell},
    panic::{self, AssertUnwindSafe},
    sync::Once,
};

use crate::log::{logger::Logger, severity::Severity};

thread_local! {
    /// How many guards are active on this thread.
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Backtrace captured by the hook for the innermost guard to pick up.
    static CAPTURED_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Chains a panic hook that records the backtrace while a guard is active.
/// The previous hook still runs afterwards.
fn install_capture_hook() {
    HOOK.call_once(|| {
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARD_DEPTH.try_with(Cell::get).unwrap_or(0) > 0 {
                let trace = Backtrace::force_capture().to_string();
                let _ = CAPTURED_TRACE.try_with(|slot| *slot.borrow_mut() = Some(trace));
            }
            prev_hook(info);
        }));
    });
}

/// Decrements the depth even when the body unwinds.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        GUARD_DEPTH.with(|d| d.set(d.get() + 1));
        DepthGuard
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        GUARD_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Runs `body`; on panic logs the crash trail to `logger`, then resumes the panic.
///
/// When `body` returns normally its value is passed through and nothing is logged.
///
/// # Example
///
/// ```rust,no_run
/// use agent_log::log::{Severity, SinkKind, global, with_crash_reporting};
///
/// global().open(SinkKind::Console, Severity::Warning, "").ok();
/// with_crash_reporting(global(), || {
///     // agent main loop
/// });
/// ```
pub fn with_crash_reporting<F, T>(logger: &Logger, body: F) -> T
where
    F: FnOnce() -> T,
{
    install_capture_hook();
    take_captured_trace();

    let result = {
        let _depth = DepthGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(body))
    };

    match result {
        Ok(value) => {
            take_captured_trace();
            value
        }
        Err(payload) => {
            // Failures resumed without a fresh panic (e.g. a joined thread's
            // payload) never reach the hook; use the guard's own stack then.
            let trace = take_captured_trace()
                .unwrap_or_else(|| Backtrace::force_capture().to_string());
            report_crash(logger, &payload_text(payload.as_ref()), &trace);
            // resume_unwind skips the hook, so an enclosing guard needs the trace back.
            if GUARD_DEPTH.with(Cell::get) > 0 {
                CAPTURED_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            }
            panic::resume_unwind(payload)
        }
    }
}

fn take_captured_trace() -> Option<String> {
    CAPTURED_TRACE.with(|slot| slot.borrow_mut().take())
}

/// Writes `Critical failure: <payload>` followed by one record per trace line.
///
/// The trace is split at every `\n`; the final segment is always written, even
/// when empty. Emission errors are ignored.
pub fn report_crash(logger: &Logger, payload: &str, trace: &str) {
    let _ = logger.log(
        Severity::Critical,
        format_args!("Critical failure: {payload}"),
    );
    for line in trace.split('\n') {
        let _ = logger.log(Severity::Critical, format_args!("{line}"));
    }
}

/// Text of a panic payload as produced by `panic!`.
#[must_use]
pub fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_owned()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::memory_log_sink::MemorySink;
    use std::sync::Arc;

    fn open_memory(level: Severity) -> (Logger, Arc<MemorySink>) {
        let logger = Logger::new();
        let sink = Arc::new(MemorySink::new());
        logger.open_with_sink(sink.clone(), level);
        (logger, sink)
    }

    #[test]
    fn report_writes_payload_then_each_trace_line() {
        let (logger, sink) = open_memory(Severity::Critical);

        report_crash(&logger, "disk full", "frame one\nframe two\nframe three");

        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(" Critical failure: disk full"));
        assert!(lines[1].ends_with(" frame one"));
        assert!(lines[2].ends_with(" frame two"));
        assert!(lines[3].ends_with(" frame three"));
    }

    #[test]
    fn trailing_newline_yields_final_empty_record() {
        let (logger, sink) = open_memory(Severity::Critical);

        report_crash(&logger, "p", "a\nb\n");

        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].ends_with(' '));
    }

    #[test]
    fn report_respects_disabled_threshold() {
        let (logger, sink) = open_memory(Severity::Empty);
        report_crash(&logger, "p", "a\nb");
        assert!(sink.is_empty());
    }

    #[test]
    fn report_on_unopened_logger_is_silent() {
        let logger = Logger::new();
        report_crash(&logger, "p", "a");
    }

    #[test]
    fn normal_completion_is_transparent() {
        let (logger, sink) = open_memory(Severity::Trace);
        let v = with_crash_reporting(&logger, || 41 + 1);
        assert_eq!(v, 42);
        assert!(sink.is_empty());
    }

    #[test]
    fn panic_is_logged_and_resumed_unchanged() {
        let (logger, sink) = open_memory(Severity::Critical);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            with_crash_reporting::<_, ()>(&logger, || panic!("disk full"))
        }));

        let payload = outcome.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"disk full"));

        let lines = sink.lines();
        assert!(lines.len() >= 2, "payload plus at least one trace line");
        assert!(lines[0].ends_with(" Critical failure: disk full"));
    }

    #[test]
    fn string_payload_keeps_its_type() {
        let (logger, sink) = open_memory(Severity::Critical);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            with_crash_reporting::<_, ()>(&logger, || panic::panic_any(String::from("code 7")))
        }));

        let payload = outcome.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "code 7");
        assert!(sink.lines()[0].ends_with(" Critical failure: code 7"));
    }

    #[inline(never)]
    fn handled_panic_site() {
        panic!("handled earlier")
    }

    #[test]
    fn resumed_payload_does_not_reuse_an_earlier_trace() {
        let (logger, sink) = open_memory(Severity::Critical);

        // A panic caught inside the body must not leak its trace.
        with_crash_reporting(&logger, || {
            assert!(panic::catch_unwind(handled_panic_site).is_err());
        });
        assert!(sink.is_empty());

        let worker = std::thread::spawn(|| -> u8 { panic!("worker died") })
            .join()
            .unwrap_err();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            with_crash_reporting::<_, ()>(&logger, || panic::resume_unwind(worker))
        }));

        let payload = outcome.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"worker died"));

        let lines = sink.lines();
        assert!(lines[0].ends_with(" Critical failure: worker died"));
        assert!(lines.len() > 2, "guard stack stands in for the missing trace");
        assert!(
            lines.iter().all(|l| !l.contains("handled_panic_site")),
            "trace of the handled panic was reported"
        );
    }

    #[test]
    fn opaque_payload_text() {
        let boxed: Box<dyn Any + Send> = Box::new(17_u32);
        assert_eq!(payload_text(boxed.as_ref()), "Box<dyn Any>");
    }
}
