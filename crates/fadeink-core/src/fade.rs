//! Timed fade-out of sealed strokes.
//!
//! Each stroke goes through `Armed → Fading → removed`:
//!
//! - on seal a one-shot timeout is armed with a random delay,
//! - when it fires the fade start time is recorded and per-frame ticks begin,
//! - every tick lowers the stroke's opacity until it reaches zero.
//!
//! [`FadeScheduler`] owns every host handle, so cancelling all fades is a
//! single call and a stale callback can always be recognised and dropped.

use crate::host::{FrameHandle, HostScheduler, TimerHandle};
use crate::store::StrokeStore;
use crate::stroke::StrokeId;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Progress after which the tail of the fade is pulled forward.
const EASE_TAIL_START: f64 = 0.8;
/// How strongly the tail is pulled forward.
const EASE_TAIL_PULL: f64 = 0.3;

/// Fade timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeTiming {
    /// Inclusive lower bound of the pre-fade delay, in ms.
    pub min_delay_ms: u32,
    /// Exclusive upper bound of the pre-fade delay, in ms.
    pub max_delay_ms: u32,
    /// Duration of the fade itself, in ms.
    pub duration_ms: f64,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            min_delay_ms: 7000,
            max_delay_ms: 9000,
            duration_ms: 1500.0,
        }
    }
}

impl FadeTiming {
    /// Fade progress in `[0, 1]` after `elapsed_ms` of fading.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms.max(0.0) / self.duration_ms).min(1.0)
    }

    /// Opacity after `elapsed_ms` of fading.
    pub fn opacity_at(&self, elapsed_ms: f64) -> f64 {
        1.0 - ease_fade(self.progress(elapsed_ms))
    }
}

/// Fade easing: linear, then the last fifth closes in slightly faster.
///
/// Monotonic and `ease_fade(1.0) == 1.0`.
pub fn ease_fade(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p < EASE_TAIL_START {
        p
    } else {
        p + (1.0 - p) * EASE_TAIL_PULL
    }
}

/// Per-stroke fade state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadePhase {
    /// Waiting for the pre-fade delay to elapse.
    Armed { timer: TimerHandle, delay_ms: u32 },
    /// Fading; `frame` is the pending tick, if any.
    Fading {
        started_at: f64,
        frame: Option<FrameHandle>,
    },
}

/// Result of a fade tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The callback no longer refers to a fading stroke; nothing was done.
    Stale,
    /// Opacity was lowered and the next tick requested.
    Continue { opacity: f64 },
    /// Opacity reached zero; the stroke should be removed.
    Finished,
}

/// Owns the fade state machine of every live stroke.
#[derive(Debug, Clone)]
pub struct FadeScheduler {
    timing: FadeTiming,
    rng: SmallRng,
    phases: HashMap<StrokeId, FadePhase>,
}

impl FadeScheduler {
    pub fn new(timing: FadeTiming, seed: u64) -> Self {
        Self {
            timing,
            rng: SmallRng::seed_from_u64(seed),
            phases: HashMap::new(),
        }
    }

    pub fn timing(&self) -> &FadeTiming {
        &self.timing
    }

    /// Current phase of a stroke, if it has one.
    pub fn phase(&self, id: StrokeId) -> Option<FadePhase> {
        self.phases.get(&id).copied()
    }

    /// Number of strokes with an outstanding timer or frame.
    pub fn pending(&self) -> usize {
        self.phases.len()
    }

    /// Draw a pre-fade delay, uniform over whole milliseconds in the configured range.
    pub fn sample_delay(&mut self) -> u32 {
        let FadeTiming {
            min_delay_ms,
            max_delay_ms,
            ..
        } = self.timing;
        if max_delay_ms <= min_delay_ms {
            return min_delay_ms;
        }
        self.rng.gen_range(min_delay_ms..max_delay_ms)
    }

    /// Arm the pre-fade timer of a freshly sealed stroke.
    ///
    /// Any task already outstanding for the stroke is cancelled first.
    pub fn arm(&mut self, id: StrokeId, host: &mut impl HostScheduler) -> u32 {
        self.cancel(id, host);
        let delay_ms = self.sample_delay();
        let timer = host.set_timeout(delay_ms as f64, id);
        self.phases.insert(id, FadePhase::Armed { timer, delay_ms });
        log::debug!("Armed fade for stroke {} in {} ms", id, delay_ms);
        delay_ms
    }

    /// The pre-fade timer fired. Returns `false` for a stale timer.
    pub fn on_timer(&mut self, id: StrokeId, host: &mut impl HostScheduler) -> bool {
        let Some(FadePhase::Armed { .. }) = self.phases.get(&id) else {
            return false;
        };
        let started_at = host.now();
        let frame = host.request_frame(id);
        self.phases.insert(
            id,
            FadePhase::Fading {
                started_at,
                frame: Some(frame),
            },
        );
        log::debug!("Fade started for stroke {} at {:.0} ms", id, started_at);
        true
    }

    /// Advance the fade of one stroke by a frame.
    ///
    /// A tick for a stroke that is not fading, or that is no longer in the
    /// store, is stale: it changes nothing and schedules nothing.
    pub fn tick(
        &mut self,
        id: StrokeId,
        store: &mut StrokeStore,
        host: &mut impl HostScheduler,
    ) -> TickOutcome {
        let Some(FadePhase::Fading { started_at, .. }) = self.phases.get(&id).copied() else {
            return TickOutcome::Stale;
        };
        let Some(stroke) = store.get_mut(id) else {
            self.phases.remove(&id);
            return TickOutcome::Stale;
        };

        let elapsed = host.now() - started_at;
        let progress = self.timing.progress(elapsed);
        stroke.fade_to(self.timing.opacity_at(elapsed));

        if progress < 1.0 {
            let frame = host.request_frame(id);
            self.phases.insert(
                id,
                FadePhase::Fading {
                    started_at,
                    frame: Some(frame),
                },
            );
            TickOutcome::Continue {
                opacity: stroke.opacity(),
            }
        } else {
            self.phases.remove(&id);
            TickOutcome::Finished
        }
    }

    /// Cancel whatever is outstanding for one stroke.
    pub fn cancel(&mut self, id: StrokeId, host: &mut impl HostScheduler) {
        match self.phases.remove(&id) {
            Some(FadePhase::Armed { timer, .. }) => host.clear_timeout(timer),
            Some(FadePhase::Fading {
                frame: Some(frame), ..
            }) => host.cancel_frame(frame),
            Some(FadePhase::Fading { frame: None, .. }) | None => {}
        }
    }

    /// Cancel every outstanding timer and frame. Returns how many strokes were affected.
    pub fn cancel_all(&mut self, host: &mut impl HostScheduler) -> usize {
        let ids: Vec<StrokeId> = self.phases.keys().copied().collect();
        for id in &ids {
            self.cancel(*id, host);
        }
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostTask, SimulatedHost};
    use crate::stroke::{InkColor, InkPoint, Stroke};

    fn store_with_stroke() -> (StrokeStore, StrokeId) {
        let mut store = StrokeStore::new();
        let stroke = Stroke::seal(vec![InkPoint::new(0.0, 0.0, "#000000")], InkColor::black(), 0.0)
            .unwrap();
        let id = stroke.id();
        store.push(stroke);
        (store, id)
    }

    #[test]
    fn test_easing_endpoints_and_monotonic() {
        assert_eq!(ease_fade(0.0), 0.0);
        assert_eq!(ease_fade(1.0), 1.0);
        let mut last = 0.0;
        for i in 0..=1000 {
            let eased = ease_fade(i as f64 / 1000.0);
            assert!(eased >= last);
            last = eased;
        }
    }

    #[test]
    fn test_opacity_reaches_zero_only_at_duration() {
        let timing = FadeTiming::default();
        assert_eq!(timing.opacity_at(0.0), 1.0);
        assert!(timing.opacity_at(1499.0) > 0.0);
        assert_eq!(timing.opacity_at(1500.0), 0.0);
        assert_eq!(timing.opacity_at(5000.0), 0.0);
    }

    #[test]
    fn test_delays_stay_in_range() {
        let mut scheduler = FadeScheduler::new(FadeTiming::default(), 42);
        for _ in 0..1000 {
            let delay = scheduler.sample_delay();
            assert!((7000..9000).contains(&delay));
        }
    }

    #[test]
    fn test_same_seed_same_delays() {
        let mut a = FadeScheduler::new(FadeTiming::default(), 9);
        let mut b = FadeScheduler::new(FadeTiming::default(), 9);
        for _ in 0..10 {
            assert_eq!(a.sample_delay(), b.sample_delay());
        }
    }

    #[test]
    fn test_arm_then_fire_then_finish() {
        let (mut store, id) = store_with_stroke();
        let mut host = SimulatedHost::with_frame_interval(10.0);
        let mut scheduler = FadeScheduler::new(FadeTiming::default(), 1);

        let delay = scheduler.arm(id, &mut host);
        assert!(matches!(scheduler.phase(id), Some(FadePhase::Armed { .. })));

        assert_eq!(host.pop_due(f64::MAX), Some(HostTask::FadeTimer(id)));
        assert_eq!(host.now(), delay as f64);
        assert!(scheduler.on_timer(id, &mut host));

        let mut last_opacity = 1.0;
        let outcome = loop {
            assert_eq!(host.pop_due(f64::MAX), Some(HostTask::Frame(id)));
            match scheduler.tick(id, &mut store, &mut host) {
                TickOutcome::Continue { opacity } => {
                    assert!(opacity <= last_opacity);
                    assert!(opacity > 0.0);
                    last_opacity = opacity;
                }
                other => break other,
            }
        };

        assert_eq!(outcome, TickOutcome::Finished);
        assert_eq!(host.now(), delay as f64 + 1500.0);
        assert_eq!(store.get(id).unwrap().opacity(), 0.0);
        assert!(scheduler.phase(id).is_none());
        assert!(host.is_idle());
    }

    #[test]
    fn test_rearm_keeps_single_task() {
        let (_store, id) = store_with_stroke();
        let mut host = SimulatedHost::new();
        let mut scheduler = FadeScheduler::new(FadeTiming::default(), 1);
        scheduler.arm(id, &mut host);
        scheduler.arm(id, &mut host);
        assert_eq!(host.pending_timers(), 1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_stale_timer_and_tick() {
        let (mut store, id) = store_with_stroke();
        let mut host = SimulatedHost::new();
        let mut scheduler = FadeScheduler::new(FadeTiming::default(), 1);

        assert!(!scheduler.on_timer(id, &mut host));
        assert_eq!(scheduler.tick(id, &mut store, &mut host), TickOutcome::Stale);
        assert!(host.is_idle());
    }

    #[test]
    fn test_tick_for_removed_stroke_is_stale() {
        let (mut store, id) = store_with_stroke();
        let mut host = SimulatedHost::new();
        let mut scheduler = FadeScheduler::new(FadeTiming::default(), 1);
        scheduler.arm(id, &mut host);
        host.pop_due(f64::MAX);
        scheduler.on_timer(id, &mut host);
        host.pop_due(f64::MAX);

        store.remove(id);
        assert_eq!(scheduler.tick(id, &mut store, &mut host), TickOutcome::Stale);
        assert!(host.is_idle());
        assert!(scheduler.phase(id).is_none());
    }

    #[test]
    fn test_cancel_all() {
        let (mut store, a) = store_with_stroke();
        let b_stroke =
            Stroke::seal(vec![InkPoint::new(1.0, 1.0, "#000000")], InkColor::black(), 0.0).unwrap();
        let b = b_stroke.id();
        store.push(b_stroke);

        let mut host = SimulatedHost::new();
        let mut scheduler = FadeScheduler::new(FadeTiming::default(), 1);
        scheduler.arm(a, &mut host);
        scheduler.arm(b, &mut host);

        // Bring `a` into its fading phase so a frame is pending too.
        while let Some(task) = host.pop_due(f64::MAX) {
            if task == HostTask::FadeTimer(a) {
                scheduler.on_timer(a, &mut host);
                break;
            }
            if task == HostTask::FadeTimer(b) {
                scheduler.on_timer(b, &mut host);
                break;
            }
        }

        assert_eq!(scheduler.cancel_all(&mut host), 2);
        assert!(host.is_idle());
        assert_eq!(scheduler.pending(), 0);
    }
}
