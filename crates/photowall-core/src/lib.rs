//! Core systems for the Photowall gallery.
//!
//! This crate provides the foundation shared by the gallery components:
//!
//! - **Signals**: Observer-style change notification ([`Signal`])
//! - **Timers**: A host-driven one-shot timer queue for debouncing and
//!   delayed cleanup ([`TimerQueue`])
//! - **Geometry**: [`Point`], [`Size`] and [`Rect`]
//! - **Logging**: `tracing` targets and span helpers
//!
//! # Signal Example
//!
//! ```
//! use photowall_core::Signal;
//!
//! let height_changed = Signal::<f32>::new();
//! let conn_id = height_changed.connect(|height| {
//!     println!("Content height is now {height}");
//! });
//!
//! height_changed.emit(420.0);
//! height_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use photowall_core::TimerQueue;
//! use std::time::{Duration, Instant};
//!
//! let mut timers = TimerQueue::new();
//! let start = Instant::now();
//! let id = timers.start_one_shot(start, Duration::from_millis(100));
//!
//! assert!(timers.process_expired(start).is_empty());
//! assert_eq!(timers.process_expired(start + Duration::from_millis(100)), vec![id]);
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod signal;
mod timer;

pub use error::{CoreError, Result, TimerError};
pub use geometry::{Point, Rect, Size};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{TimerId, TimerQueue};
