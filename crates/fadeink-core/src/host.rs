//! Host clock and scheduling primitives.
//!
//! The doodle layer never blocks or spawns. It asks its host for two things:
//! a one-shot delayed callback and a per-frame callback. The host later calls
//! back into the layer with the stroke id the task was scheduled for.

use crate::stroke::StrokeId;

/// Handle of a pending one-shot timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Handle of a pending animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Scheduling services supplied by the environment.
pub trait HostScheduler {
    /// Current host time in milliseconds.
    fn now(&self) -> f64;

    /// Schedule the fade-start callback for `stroke` after `delay_ms`.
    fn set_timeout(&mut self, delay_ms: f64, stroke: StrokeId) -> TimerHandle;

    /// Cancel a pending timeout. Unknown or already-fired handles are ignored.
    fn clear_timeout(&mut self, handle: TimerHandle);

    /// Request a fade tick for `stroke` on the next display frame.
    fn request_frame(&mut self, stroke: StrokeId) -> FrameHandle;

    /// Cancel a pending frame request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A callback the host owes the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTask {
    /// The pre-fade delay of a stroke elapsed.
    FadeTimer(StrokeId),
    /// A display frame arrived for a fading stroke.
    Frame(StrokeId),
}

/// Default simulated frame interval (~66 Hz).
///
/// Divides the default fade duration, so the last tick of a fade lands
/// exactly on its end.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 15.0;
/// Shortest frame interval a simulated host accepts.
pub const MIN_FRAME_INTERVAL_MS: f64 = 1.0;

#[derive(Debug, Clone)]
struct Scheduled {
    due: f64,
    seq: u64,
    handle: u64,
    task: HostTask,
}

/// Deterministic virtual-time host.
///
/// Tasks are kept in a due-ordered queue; [`SimulatedHost::pop_due`] hands
/// them out one by one and moves the clock to each task's due time. Frame
/// requests are due one frame interval after they were made.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    now: f64,
    frame_interval: f64,
    next_id: u64,
    queue: Vec<Scheduled>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL_MS)
    }

    pub fn with_frame_interval(frame_interval: f64) -> Self {
        Self {
            now: 0.0,
            frame_interval: frame_interval.max(MIN_FRAME_INTERVAL_MS),
            next_id: 1,
            queue: Vec::new(),
        }
    }

    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }

    /// Remove and return the earliest task due at or before `until`,
    /// advancing the clock to its due time.
    pub fn pop_due(&mut self, until: f64) -> Option<HostTask> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        let scheduled = self.queue.remove(index);
        self.now = self.now.max(scheduled.due);
        Some(scheduled.task)
    }

    /// Move the clock forward to `time` without running anything.
    pub fn set_now(&mut self, time: f64) {
        self.now = self.now.max(time);
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<f64> {
        self.queue.iter().map(|s| s.due).min_by(f64::total_cmp)
    }

    pub fn pending_timers(&self) -> usize {
        self.queue
            .iter()
            .filter(|s| matches!(s.task, HostTask::FadeTimer(_)))
            .count()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue
            .iter()
            .filter(|s| matches!(s.task, HostTask::Frame(_)))
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    fn schedule(&mut self, due: f64, task: HostTask) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Scheduled {
            due,
            seq: id,
            handle: id,
            task,
        });
        id
    }

    fn cancel(&mut self, handle: u64) {
        self.queue.retain(|s| s.handle != handle);
    }
}

impl HostScheduler for SimulatedHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn set_timeout(&mut self, delay_ms: f64, stroke: StrokeId) -> TimerHandle {
        let due = self.now + delay_ms.max(0.0);
        TimerHandle(self.schedule(due, HostTask::FadeTimer(stroke)))
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.cancel(handle.0);
    }

    fn request_frame(&mut self, stroke: StrokeId) -> FrameHandle {
        let due = self.now + self.frame_interval;
        FrameHandle(self.schedule(due, HostTask::Frame(stroke)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancel(handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_tasks_pop_in_due_order() {
        let mut host = SimulatedHost::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        host.set_timeout(100.0, a);
        host.set_timeout(50.0, b);

        assert!(host.pop_due(10.0).is_none());
        assert_eq!(host.pop_due(1000.0), Some(HostTask::FadeTimer(b)));
        assert_eq!(host.now(), 50.0);
        assert_eq!(host.pop_due(1000.0), Some(HostTask::FadeTimer(a)));
        assert_eq!(host.now(), 100.0);
        assert!(host.is_idle());
    }

    #[test]
    fn test_same_due_keeps_submission_order() {
        let mut host = SimulatedHost::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        host.request_frame(a);
        host.request_frame(b);
        assert_eq!(host.pop_due(15.0), Some(HostTask::Frame(a)));
        assert_eq!(host.pop_due(15.0), Some(HostTask::Frame(b)));
    }

    #[test]
    fn test_frame_interval_floor() {
        let mut host = SimulatedHost::with_frame_interval(1e-300);
        assert_eq!(host.frame_interval(), MIN_FRAME_INTERVAL_MS);
        host.request_frame(Uuid::new_v4());
        assert_eq!(host.next_due(), Some(1.0));
    }

    #[test]
    fn test_cancel() {
        let mut host = SimulatedHost::new();
        let id = Uuid::new_v4();
        let timer = host.set_timeout(10.0, id);
        let frame = host.request_frame(id);
        assert_eq!(host.pending_timers(), 1);
        assert_eq!(host.pending_frames(), 1);

        host.clear_timeout(timer);
        host.cancel_frame(frame);
        assert!(host.is_idle());
        // Cancelling twice is harmless.
        host.clear_timeout(timer);
    }

    #[test]
    fn test_clock_never_goes_back() {
        let mut host = SimulatedHost::new();
        host.set_now(500.0);
        host.set_now(100.0);
        assert_eq!(host.now(), 500.0);
    }
}
