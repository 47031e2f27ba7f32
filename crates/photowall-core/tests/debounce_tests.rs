//! Timer and signal working together the way the gallery debounces resizes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use photowall_core::{Signal, TimerId, TimerQueue};
use tracing_subscriber::EnvFilter;

const QUIET: Duration = Duration::from_millis(100);

/// Restarts its timer on every resize and fires `settled` once the quiet
/// period passes.
struct Debouncer {
    timers: TimerQueue,
    pending: Option<TimerId>,
    width: f32,
    settled: Signal<f32>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            timers: TimerQueue::new(),
            pending: None,
            width: 0.0,
            settled: Signal::new(),
        }
    }

    fn resize(&mut self, now: Instant, width: f32) {
        if let Some(id) = self.pending.take() {
            let _ = self.timers.stop(id);
        }
        self.width = width;
        self.pending = Some(self.timers.start_one_shot(now, QUIET));
    }

    fn tick(&mut self, now: Instant) {
        let fired = self.timers.process_expired(now);
        if self.pending.is_some_and(|id| fired.contains(&id)) {
            self.pending = None;
            self.settled.emit(self.width);
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_burst_of_resizes_settles_once() {
    init_tracing();
    let start = Instant::now();
    let mut debouncer = Debouncer::new();
    let settled = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let recorder = settled.clone();
    debouncer
        .settled
        .connect(move |width| recorder.lock().push(*width));

    for (step, width) in [800.0, 760.0, 720.0, 700.0].into_iter().enumerate() {
        let now = start + Duration::from_millis(30 * step as u64);
        debouncer.resize(now, width);
        debouncer.tick(now);
    }
    assert!(settled.lock().is_empty());

    // Last resize at 90ms; quiet period ends at 190ms.
    debouncer.tick(start + Duration::from_millis(189));
    assert!(settled.lock().is_empty());
    debouncer.tick(start + Duration::from_millis(190));
    assert_eq!(*settled.lock(), vec![700.0]);

    debouncer.tick(start + Duration::from_secs(5));
    assert_eq!(settled.lock().len(), 1);
    assert_eq!(debouncer.timers.active_count(), 0);
}

#[test]
fn test_stopped_timer_never_fires() {
    let start = Instant::now();
    let mut timers = TimerQueue::new();
    let stopped = timers.start_one_shot(start, QUIET);
    let kept = timers.start_one_shot(start, QUIET * 2);

    timers.stop(stopped).unwrap();
    assert!(timers.stop(stopped).is_err());
    assert_eq!(timers.time_until_next(start), Some(QUIET * 2));
    assert_eq!(timers.process_expired(start + QUIET * 3), vec![kept]);
}

#[test]
fn test_blocked_signal_drops_emits() {
    let signal = Signal::<f32>::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    signal.connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    signal.set_blocked(true);
    signal.emit(1.0);
    signal.set_blocked(false);
    signal.emit(2.0);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scoped_connection_disconnects_on_drop() {
    let signal = Signal::<bool>::new();
    {
        let _guard = signal.connect_scoped(|_| {});
        assert_eq!(signal.connection_count(), 1);
    }
    assert_eq!(signal.connection_count(), 0);
}
