//! Scroll-driven pagination trigger.
//!
//! The UI feeds raw scroll geometry in; the trigger decides whether it is
//! time to fetch the next page. The policy: fire when the visible position is
//! within a fixed distance of the content's trailing edge, the controller
//! reports it is ready for more, and the debounce window since the last
//! evaluation has elapsed. Scroll callbacks arrive at high frequency, so the
//! debounce keeps a fast fling from evaluating the threshold dozens of times
//! per page.
//!
//! The trigger is pure core logic — no UI framework types, no timers. Tests
//! drive [`ScrollTrigger::evaluate_at`] with explicit instants.

use std::time::{Duration, Instant};

/// Scroll geometry as reported by whatever hosts the list.
///
/// All three values share one unit (points, pixels, rows — the trigger does
/// not care, as long as the threshold uses the same unit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the content.
    pub offset: f64,
    /// Height of the visible viewport.
    pub viewport: f64,
    /// Total height of the content.
    pub content: f64,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the end of the
    /// content. Zero or negative when scrolled past the end (bounce).
    pub fn distance_to_end(&self) -> f64 {
        self.content - (self.offset + self.viewport)
    }
}

/// Threshold + debounce gate for "should I fetch more now".
pub struct ScrollTrigger {
    threshold: f64,
    debounce: Duration,
    last_evaluated: Option<Instant>,
}

impl ScrollTrigger {
    /// `threshold` is the fire distance from the trailing edge; `debounce`
    /// is the minimum interval between evaluations.
    pub fn new(threshold: f64, debounce: Duration) -> Self {
        Self {
            threshold,
            debounce,
            last_evaluated: None,
        }
    }

    /// Evaluate against the current clock. `ready_for_more` is the
    /// controller's own gate (cursor exists, nothing in flight, list
    /// non-empty) — see `ListController::ready_for_more`.
    pub fn evaluate(&mut self, metrics: ScrollMetrics, ready_for_more: bool) -> bool {
        self.evaluate_at(Instant::now(), metrics, ready_for_more)
    }

    /// Evaluate at an explicit instant. Returns `true` when a fetch-more
    /// should be issued now; consumes the debounce window when it does
    /// evaluate, whether or not it fires.
    pub fn evaluate_at(
        &mut self,
        now: Instant,
        metrics: ScrollMetrics,
        ready_for_more: bool,
    ) -> bool {
        if let Some(last) = self.last_evaluated {
            if now.duration_since(last) < self.debounce {
                return false;
            }
        }
        self.last_evaluated = Some(now);

        ready_for_more && metrics.distance_to_end() <= self.threshold
    }
}
