use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::clipboard::ClipSource;
use crate::store::ClipStore;

/// Stop flag plus the condvar that makes the inter-tick wait
/// interruptible, so `stop()` takes effect without waiting out a full
/// poll period.
struct MonitorState {
    stopped: Mutex<bool>,
    tick: Condvar,
}

impl MonitorState {
    fn new() -> Self {
        Self {
            stopped: Mutex::new(false),
            tick: Condvar::new(),
        }
    }

    fn lock_stopped(&self) -> std::sync::MutexGuard<'_, bool> {
        match self.stopped.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn reset(&self) {
        *self.lock_stopped() = false;
    }

    fn request_stop(&self) {
        *self.lock_stopped() = true;
        self.tick.notify_all();
    }

    fn is_stopped(&self) -> bool {
        *self.lock_stopped()
    }

    /// Sleep until the next tick or a stop request, whichever comes
    /// first. Returns true when the loop should exit.
    fn wait_for_tick(&self, interval: Duration) -> bool {
        let guard = self.lock_stopped();
        if *guard {
            return true;
        }
        match self.tick.wait_timeout(guard, interval) {
            Ok((stopped, _timeout)) => *stopped,
            Err(poisoned) => *poisoned.into_inner().0,
        }
    }
}

/// The polling loop: sample the source each tick, forward changed
/// values to the store. One monitor owns at most one worker thread.
pub struct ClipMonitor {
    store: Arc<dyn ClipStore>,
    interval: Duration,
    state: Arc<MonitorState>,
    worker: Option<JoinHandle<()>>,
}

impl ClipMonitor {
    pub fn new(store: Arc<dyn ClipStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            state: Arc::new(MonitorState::new()),
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Spawn the polling worker. No-op (returns false) when already
    /// running.
    pub fn start<S>(&mut self, source: S) -> bool
    where
        S: ClipSource + Send + 'static,
    {
        if self.worker.is_some() {
            return false;
        }
        self.state.reset();
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        let interval = self.interval;
        self.worker = Some(thread::spawn(move || run_loop(source, store, state, interval)));
        true
    }

    /// Signal the worker and wait for it to finish its current tick.
    /// No-op (returns false) when already stopped.
    pub fn stop(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return false;
        };
        self.state.request_stop();
        if worker.join().is_err() {
            warn!("monitor worker panicked");
        }
        true
    }
}

impl Drop for ClipMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut source: impl ClipSource,
    store: Arc<dyn ClipStore>,
    state: Arc<MonitorState>,
    interval: Duration,
) {
    debug!(interval_ms = interval.as_millis() as u64, "clipboard monitor started");
    // Only this thread ever touches last_seen; it advances solely on a
    // successful store write, so a failed append is retried as long as
    // the clipboard still holds the new value.
    let mut last_seen: Option<String> = None;

    loop {
        if state.is_stopped() {
            break;
        }

        if let Some(text) = source.read() {
            if !text.trim().is_empty() && last_seen.as_deref() != Some(text.as_str()) {
                match store.append(&text) {
                    Ok(()) => {
                        debug!(len = text.len(), "captured clip");
                        last_seen = Some(text);
                    }
                    Err(e) => warn!(error = %e, "clip append failed, will retry"),
                }
            }
        }

        if state.wait_for_tick(interval) {
            break;
        }
    }
    debug!("clipboard monitor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::ClipRecord;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    const TICK: Duration = Duration::from_millis(1);

    /// Replays a fixed sequence of reads, then reports empty.
    struct ScriptedSource {
        reads: VecDeque<Option<String>>,
    }

    impl ScriptedSource {
        fn new(reads: &[Option<&str>]) -> Self {
            Self {
                reads: reads
                    .iter()
                    .map(|r| r.map(|s| s.to_string()))
                    .collect(),
            }
        }
    }

    impl ClipSource for ScriptedSource {
        fn read(&mut self) -> Option<String> {
            self.reads.pop_front().flatten()
        }
    }

    /// Always returns the same value and counts how often it was asked.
    struct RepeatingSource {
        value: String,
        reads: Arc<AtomicUsize>,
    }

    impl ClipSource for RepeatingSource {
        fn read(&mut self) -> Option<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Some(self.value.clone())
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        appended: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn appended(&self) -> Vec<String> {
            self.appended.lock().unwrap().clone()
        }
    }

    impl ClipStore for RecordingStore {
        fn append(&self, content: &str) -> Result<(), Error> {
            self.appended.lock().unwrap().push(content.to_string());
            Ok(())
        }

        fn recent(&self, _filter: &str) -> Result<Vec<ClipRecord>, Error> {
            Ok(Vec::new())
        }
    }

    struct FailingStore {
        attempts: Arc<AtomicUsize>,
    }

    impl ClipStore for FailingStore {
        fn append(&self, _content: &str) -> Result<(), Error> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(Error::Persistence("disk full".to_string()))
        }

        fn recent(&self, _filter: &str) -> Result<Vec<ClipRecord>, Error> {
            Ok(Vec::new())
        }
    }

    fn wait_until(deadline_ms: u64, mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while !done() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn duplicate_runs_store_once_per_value_change() {
        let store = Arc::new(RecordingStore::default());
        let mut monitor = ClipMonitor::new(store.clone() as Arc<dyn ClipStore>, TICK);
        let source = ScriptedSource::new(&[
            Some("a"),
            Some("a"),
            Some("a"),
            Some("b"),
            Some("b"),
            Some("a"),
        ]);

        monitor.start(source);
        wait_until(2000, || store.appended().len() >= 3);
        monitor.stop();

        assert_eq!(store.appended(), vec!["a", "b", "a"]);
    }

    #[test]
    fn failed_reads_and_blank_text_skip_the_tick() {
        let store = Arc::new(RecordingStore::default());
        let mut monitor = ClipMonitor::new(store.clone() as Arc<dyn ClipStore>, TICK);
        let source = ScriptedSource::new(&[
            None,
            Some(""),
            Some("   \n"),
            Some("real"),
            None,
            Some("real"),
        ]);

        monitor.start(source);
        wait_until(2000, || !store.appended().is_empty());
        monitor.stop();

        assert_eq!(store.appended(), vec!["real"]);
    }

    #[test]
    fn append_failure_does_not_kill_the_loop() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let reads = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(FailingStore {
            attempts: attempts.clone(),
        });
        let mut monitor = ClipMonitor::new(store as Arc<dyn ClipStore>, TICK);
        let source = RepeatingSource {
            value: "x".to_string(),
            reads: reads.clone(),
        };

        monitor.start(source);
        // Several ticks after the first failure prove the loop is alive
        // and still retrying the unstored value.
        wait_until(2000, || attempts.load(Ordering::SeqCst) >= 3);
        monitor.stop();

        assert!(attempts.load(Ordering::SeqCst) >= 3);
        assert!(reads.load(Ordering::SeqCst) >= attempts.load(Ordering::SeqCst));
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let store = Arc::new(RecordingStore::default());
        let mut monitor = ClipMonitor::new(store as Arc<dyn ClipStore>, TICK);

        assert!(monitor.start(ScriptedSource::new(&[])));
        assert!(!monitor.start(ScriptedSource::new(&[])), "second start is a no-op");
        assert!(monitor.is_running());

        assert!(monitor.stop());
        assert!(!monitor.stop(), "second stop is a no-op");
        assert!(!monitor.is_running());
    }

    #[test]
    fn monitor_restarts_after_stop() {
        let store = Arc::new(RecordingStore::default());
        let mut monitor = ClipMonitor::new(store.clone() as Arc<dyn ClipStore>, TICK);

        monitor.start(ScriptedSource::new(&[Some("first")]));
        wait_until(2000, || !store.appended().is_empty());
        monitor.stop();

        monitor.start(ScriptedSource::new(&[Some("second")]));
        wait_until(2000, || store.appended().len() >= 2);
        monitor.stop();

        assert_eq!(store.appended(), vec!["first", "second"]);
    }

    #[test]
    fn stop_returns_promptly_despite_long_interval() {
        let store = Arc::new(RecordingStore::default());
        let mut monitor =
            ClipMonitor::new(store as Arc<dyn ClipStore>, Duration::from_secs(60));

        monitor.start(ScriptedSource::new(&[]));
        thread::sleep(Duration::from_millis(20));

        let began = Instant::now();
        monitor.stop();
        assert!(
            began.elapsed() < Duration::from_secs(5),
            "stop must interrupt the inter-tick wait"
        );
    }
}
