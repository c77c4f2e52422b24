//! Integration tests for the dispatcher core.
//!
//! These tests exercise the complete dispatch workflow:
//! - Fan-out delivery and registration ordering
//! - Per-backend failure isolation
//! - Close lifecycle and error aggregation
//! - Concurrent add + logging
//! - Fatal dispatch through an injected exit handler
//! - Verbosity gating

use fanlog::backends::discard::Discard;
use fanlog::backends::replay::{Entry, Replay};
use fanlog::{errorf, infof};
use fanlog::{AttribStore, Backend, BackendError, Dispatcher, Level, Message};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

// =============================================================================
// Test Helpers
// =============================================================================

/// Pushes its name into a shared journal on every write.
struct NamedBackend {
    name: &'static str,
    journal: Arc<Mutex<Vec<&'static str>>>,
}

struct NamedMessage<'a> {
    parent: &'a NamedBackend,
}

impl Backend for NamedBackend {
    fn message<'a>(&'a self, _level: Level, _text: &str) -> Box<dyn Message + 'a> {
        Box::new(NamedMessage { parent: self })
    }

    fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

impl Message for NamedMessage<'_> {
    fn compose(&mut self, _attribs: &AttribStore) -> Result<(), BackendError> {
        Ok(())
    }

    fn write(&mut self) -> Result<(), BackendError> {
        self.parent.journal.lock().unwrap().push(self.parent.name);
        Ok(())
    }
}

/// A backend whose compose or write always fails.
struct FailingBackend {
    fail_compose: bool,
}

struct FailingMessage {
    fail_compose: bool,
}

impl Backend for FailingBackend {
    fn message<'a>(&'a self, _level: Level, _text: &str) -> Box<dyn Message + 'a> {
        Box::new(FailingMessage {
            fail_compose: self.fail_compose,
        })
    }

    fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

impl Message for FailingMessage {
    fn compose(&mut self, _attribs: &AttribStore) -> Result<(), BackendError> {
        if self.fail_compose {
            Err(BackendError::MissingAttrib {
                key: "Unobtainium".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn write(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Sink("sink rejected the message".to_string()))
    }
}

/// Counts close calls and optionally fails them.
struct CloseProbe {
    closes: Arc<AtomicUsize>,
    fail: bool,
}

struct SilentMessage;

impl Backend for CloseProbe {
    fn message<'a>(&'a self, _level: Level, _text: &str) -> Box<dyn Message + 'a> {
        Box::new(SilentMessage)
    }

    fn close(&self) -> Result<(), BackendError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(BackendError::Sink("refusing to close".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Message for SilentMessage {
    fn compose(&mut self, _attribs: &AttribStore) -> Result<(), BackendError> {
        Ok(())
    }

    fn write(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

// =============================================================================
// Fan-out
// =============================================================================

#[test]
fn test_every_backend_receives_every_call_with_identical_text() {
    let d = Dispatcher::new();
    let first = Arc::new(Replay::new());
    let second = Arc::new(Replay::new());
    d.add(first.clone());
    d.add(second.clone());

    d.warning("low disk space");

    for replay in [&first, &second] {
        let captured = replay.warning();
        assert_eq!(
            captured.as_slice(),
            &[Entry::new(Level::WARNING, "low disk space")]
        );
    }
}

#[test]
fn test_fanout_follows_registration_order_and_late_add() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let d = Dispatcher::new();
    d.add(Arc::new(NamedBackend {
        name: "a",
        journal: journal.clone(),
    }));
    d.add(Arc::new(NamedBackend {
        name: "b",
        journal: journal.clone(),
    }));

    d.info("first");
    d.add(Arc::new(NamedBackend {
        name: "c",
        journal: journal.clone(),
    }));
    d.info("second");

    // "c" participates only in the call made after it was added.
    assert_eq!(*journal.lock().unwrap(), vec!["a", "b", "a", "b", "c"]);
}

#[test]
fn test_failing_backends_do_not_silence_siblings() {
    let d = Dispatcher::new();
    let recorder = Arc::new(Replay::new());
    d.add(Arc::new(FailingBackend { fail_compose: true }));
    d.add(recorder.clone());
    d.add(Arc::new(FailingBackend {
        fail_compose: false,
    }));

    d.error("still heard");

    assert_eq!(
        recorder.error().as_slice(),
        &[Entry::new(Level::ERROR, "still heard")]
    );
}

// =============================================================================
// Replay semantics through the dispatcher
// =============================================================================

#[test]
fn test_replay_query_semantics() {
    let d = Dispatcher::new();
    let replay = Arc::new(Replay::new());
    d.add(replay.clone());

    d.info("a");
    d.error("b");
    d.info("c");

    assert_eq!(
        replay.info().as_slice(),
        &[Entry::new(Level::INFO, "a"), Entry::new(Level::INFO, "c")]
    );
    assert_eq!(replay.error().as_slice(), &[Entry::new(Level::ERROR, "b")]);
    assert_eq!(
        replay.all().as_slice(),
        &[
            Entry::new(Level::INFO, "a"),
            Entry::new(Level::ERROR, "b"),
            Entry::new(Level::INFO, "c"),
        ]
    );

    replay.reset();
    assert_eq!(replay.all().len(), 0);
    assert_eq!(replay.info().len(), 0);
    assert_eq!(replay.error().len(), 0);
}

#[test]
fn test_formatted_variants_render_exact_text() {
    let d = Dispatcher::new();
    let replay = Arc::new(Replay::new());
    d.add(replay.clone());

    errorf!(d, "{} items", 3);
    infof!(d, "answer={answer}", answer = 42);

    assert_eq!(replay.error().as_slice(), &[Entry::new(Level::ERROR, "3 items")]);
    assert_eq!(replay.info().as_slice(), &[Entry::new(Level::INFO, "answer=42")]);
}

// =============================================================================
// Close lifecycle
// =============================================================================

#[test]
fn test_close_closes_each_backend_once_and_aggregates_failures() {
    let closes = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.add(Arc::new(CloseProbe {
        closes: closes.clone(),
        fail: true,
    }));
    d.add(Arc::new(CloseProbe {
        closes: closes.clone(),
        fail: false,
    }));
    d.add(Arc::new(CloseProbe {
        closes: closes.clone(),
        fail: true,
    }));

    let err = d.close().unwrap_err();
    assert_eq!(err.failures().len(), 2);
    assert_eq!(closes.load(Ordering::SeqCst), 3);

    // The registry is drained: closing again has nothing left to close.
    assert!(d.close().is_ok());
    assert_eq!(closes.load(Ordering::SeqCst), 3);
}

#[test]
fn test_logging_after_close_is_a_safe_noop() {
    let d = Dispatcher::new();
    let replay = Arc::new(Replay::new());
    d.add(replay.clone());
    d.info("before");
    d.close().unwrap();

    d.info("after");

    assert_eq!(replay.all().len(), 1);
    assert_eq!(d.backend_count(), 0);
}

#[test]
fn test_add_after_close_reopens() {
    let d = Dispatcher::new();
    d.add(Arc::new(Discard::new()));
    d.close().unwrap();

    let replay = Arc::new(Replay::new());
    d.add(replay.clone());
    d.info("reopened");

    assert!(replay.info().contains_str("reopened"));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_adds_and_logging() {
    const ADDERS: usize = 4;
    const ADDS_PER_THREAD: usize = 25;
    const LOGGERS: usize = 4;
    const LOGS_PER_THREAD: usize = 100;

    let d = Arc::new(Dispatcher::new());
    let replay = Arc::new(Replay::new());
    d.add(replay.clone());

    let mut handles = Vec::new();
    for _ in 0..ADDERS {
        let d = d.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..ADDS_PER_THREAD {
                d.add(Arc::new(Discard::new()));
            }
        }));
    }
    for worker in 0..LOGGERS {
        let d = d.clone();
        handles.push(thread::spawn(move || {
            for i in 0..LOGS_PER_THREAD {
                d.info(format!("worker {} message {}", worker, i));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // No backend was lost and no message was dropped.
    assert_eq!(d.backend_count(), 1 + ADDERS * ADDS_PER_THREAD);
    assert_eq!(replay.all().len(), LOGGERS * LOGS_PER_THREAD);
}

// =============================================================================
// Fatal
// =============================================================================

#[test]
fn test_fatal_writes_everywhere_before_exit_handler_runs() {
    let d = Dispatcher::new();
    let replay = Arc::new(Replay::new());
    d.add(Arc::new(FailingBackend { fail_compose: true }));
    d.add(replay.clone());

    let observed: Arc<Mutex<Option<(i32, usize)>>> = Arc::new(Mutex::new(None));
    {
        let observed = observed.clone();
        let replay = replay.clone();
        d.set_exit_handler(move |code| {
            *observed.lock().unwrap() = Some((code, replay.fatal().len()));
        });
    }

    d.fatal("last words");

    let (code, fatal_count_at_exit) = observed.lock().unwrap().expect("exit handler did not run");
    assert_eq!(code, 1);
    // The recorder had already captured the message when the handler fired.
    assert_eq!(fatal_count_at_exit, 1);
    assert!(replay.fatal().contains_str("last words"));
}

// =============================================================================
// Verbosity
// =============================================================================

#[test]
fn test_verbosity_threshold_gates_dispatch() {
    let d = Dispatcher::new();
    let replay = Arc::new(Replay::new());
    d.add(replay.clone());
    d.set_verbosity(2);

    d.info_with("at threshold").with(fanlog::verbosity(2)).go();
    d.info_with("below threshold").with(fanlog::verbosity(1)).go();
    d.info_with("above threshold").with(fanlog::verbosity(3)).go();

    assert!(replay.info().contains_str("at threshold"));
    assert!(replay.info().contains_str("below threshold"));
    assert!(!replay.info().contains_str("above threshold"));
    assert_eq!(replay.all().len(), 2);
}
