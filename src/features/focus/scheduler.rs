//! Cooperative two-cadence scheduler.
//!
//! A fast display driver and a slower detection driver share one thread.
//! The caller asks for the next due task, runs it to completion, then reports
//! it finished. A driver never starts while its previous run is in flight,
//! and deadlines missed while a task overran are dropped rather than queued.

/// Default detection cadence.
pub const DEFAULT_DETECTION_INTERVAL_MS: u64 = 500;

/// A periodic task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Accumulate one quantum and refresh outputs.
    Display,
    /// Sample a frame and classify it.
    Detection,
}

#[derive(Debug, Clone)]
struct PeriodicDriver {
    period_ms: u64,
    next_due_ms: Option<u64>,
    in_flight: bool,
    dropped: u64,
}

impl PeriodicDriver {
    const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            next_due_ms: None,
            in_flight: false,
            dropped: 0,
        }
    }

    fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.period_ms));
        self.in_flight = false;
    }

    fn disarm(&mut self) {
        self.next_due_ms = None;
        self.in_flight = false;
    }

    fn due_at(&self, now_ms: u64) -> Option<u64> {
        self.next_due_ms.filter(|due| *due <= now_ms && !self.in_flight)
    }

    /// Schedule the next run after `now_ms`, skipping missed deadlines.
    fn finish(&mut self, now_ms: u64) -> u64 {
        self.in_flight = false;
        let Some(due) = self.next_due_ms else {
            return 0;
        };

        let mut next = due.saturating_add(self.period_ms);
        let mut skipped = 0;
        if next <= now_ms {
            skipped = (now_ms - next) / self.period_ms + 1;
            next = next.saturating_add(skipped.saturating_mul(self.period_ms));
        }
        self.next_due_ms = Some(next);
        self.dropped = self.dropped.saturating_add(skipped);
        skipped
    }
}

/// Display and detection drivers.
#[derive(Debug, Clone)]
pub struct Scheduler {
    display: PeriodicDriver,
    detection: PeriodicDriver,
}

impl Scheduler {
    /// Create a disarmed scheduler. Zero periods are raised to 1 ms.
    #[must_use]
    pub fn new(display_interval_ms: u64, detection_interval_ms: u64) -> Self {
        Self {
            display: PeriodicDriver::new(display_interval_ms.max(1)),
            detection: PeriodicDriver::new(detection_interval_ms.max(1)),
        }
    }

    /// Arm both drivers; the first runs are one period after `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.display.arm(now_ms);
        self.detection.arm(now_ms);
    }

    /// Disarm both drivers. Nothing runs until the next `arm`.
    pub fn disarm(&mut self) {
        self.display.disarm();
        self.detection.disarm();
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.display.next_due_ms.is_some() || self.detection.next_due_ms.is_some()
    }

    /// The earliest due task, if any. Display wins ties.
    #[must_use]
    pub fn next_due(&self, now_ms: u64) -> Option<Task> {
        match (self.display.due_at(now_ms), self.detection.due_at(now_ms)) {
            (Some(display), Some(detection)) if detection < display => Some(Task::Detection),
            (Some(_), _) => Some(Task::Display),
            (None, Some(_)) => Some(Task::Detection),
            (None, None) => None,
        }
    }

    /// Mark a task as running. Returns false if it is disarmed or already
    /// in flight, in which case it must not run.
    pub fn begin(&mut self, task: Task) -> bool {
        let driver = self.driver_mut(task);
        if driver.in_flight || driver.next_due_ms.is_none() {
            return false;
        }
        driver.in_flight = true;
        true
    }

    /// Mark a task as done at `now_ms` and schedule its next run.
    ///
    /// Returns the number of deadlines dropped because the task (or the
    /// caller) fell behind.
    pub fn finish(&mut self, task: Task, now_ms: u64) -> u64 {
        let skipped = self.driver_mut(task).finish(now_ms);
        if skipped > 0 {
            log::debug!("{task:?} driver fell behind, dropped {skipped} tick(s)");
        }
        skipped
    }

    /// Whether a task is currently running.
    #[must_use]
    pub const fn in_flight(&self, task: Task) -> bool {
        match task {
            Task::Display => self.display.in_flight,
            Task::Detection => self.detection.in_flight,
        }
    }

    /// Total deadlines dropped for a task since creation.
    #[must_use]
    pub const fn dropped(&self, task: Task) -> u64 {
        match task {
            Task::Display => self.display.dropped,
            Task::Detection => self.detection.dropped,
        }
    }

    /// Time of the next scheduled run of any task.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.display.next_due_ms, self.detection.next_due_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn driver_mut(&mut self, task: Task) -> &mut PeriodicDriver {
        match task {
            Task::Display => &mut self.display,
            Task::Detection => &mut self.detection,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(
            crate::features::focus::timer::DEFAULT_DISPLAY_INTERVAL_MS,
            DEFAULT_DETECTION_INTERVAL_MS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scheduler: &mut Scheduler, now_ms: u64) -> Vec<Task> {
        let mut ran = Vec::new();
        while let Some(task) = scheduler.next_due(now_ms) {
            assert!(scheduler.begin(task));
            ran.push(task);
            scheduler.finish(task, now_ms);
        }
        ran
    }

    #[test]
    fn test_disarmed_runs_nothing() {
        let scheduler = Scheduler::default();
        assert!(!scheduler.is_armed());
        assert!(scheduler.next_due(10_000).is_none());
    }

    #[test]
    fn test_cadences() {
        let mut scheduler = Scheduler::default();
        scheduler.arm(0);

        let mut display = 0;
        let mut detection = 0;
        for now in (0..=1_000).step_by(10) {
            for task in run(&mut scheduler, now) {
                match task {
                    Task::Display => display += 1,
                    Task::Detection => detection += 1,
                }
            }
        }

        assert_eq!(display, 10);
        assert_eq!(detection, 2);
    }

    #[test]
    fn test_display_wins_ties() {
        let mut scheduler = Scheduler::default();
        scheduler.arm(0);
        for now in (100..500).step_by(100) {
            run(&mut scheduler, now);
        }

        assert_eq!(run(&mut scheduler, 500), vec![Task::Display, Task::Detection]);
    }

    #[test]
    fn test_in_flight_task_is_not_started_again() {
        let mut scheduler = Scheduler::default();
        scheduler.arm(0);

        assert_eq!(scheduler.next_due(500), Some(Task::Display));
        assert!(scheduler.begin(Task::Detection));
        assert!(scheduler.in_flight(Task::Detection));
        assert!(!scheduler.begin(Task::Detection));

        // Only display ticks are offered while detection is running.
        scheduler.begin(Task::Display);
        scheduler.finish(Task::Display, 500);
        assert_eq!(scheduler.next_due(500), None);
    }

    #[test]
    fn test_overrun_drops_missed_deadlines() {
        let mut scheduler = Scheduler::default();
        scheduler.arm(0);
        for now in (100..=400).step_by(100) {
            run(&mut scheduler, now);
        }

        // Detection due at 500 takes until 1_700.
        assert_eq!(scheduler.next_due(500), Some(Task::Display));
        run_one(&mut scheduler, Task::Display, 500);
        assert!(scheduler.begin(Task::Detection));
        let skipped = scheduler.finish(Task::Detection, 1_700);

        assert_eq!(skipped, 2);
        assert_eq!(scheduler.dropped(Task::Detection), 2);
        // Next detection is back in phase after the overrun.
        assert!(scheduler.next_due(1_999).map_or(true, |t| t == Task::Display));
        assert_eq!(scheduler.next_deadline(), Some(600));
    }

    fn run_one(scheduler: &mut Scheduler, task: Task, now_ms: u64) {
        assert!(scheduler.begin(task));
        scheduler.finish(task, now_ms);
    }

    #[test]
    fn test_disarm_cancels_pending() {
        let mut scheduler = Scheduler::default();
        scheduler.arm(0);
        assert!(scheduler.next_due(600).is_some());

        scheduler.disarm();
        assert!(scheduler.next_due(600).is_none());
        assert!(!scheduler.begin(Task::Display));
        assert!(scheduler.next_deadline().is_none());
    }

    #[test]
    fn test_zero_period_is_raised() {
        let mut scheduler = Scheduler::new(0, 0);
        scheduler.arm(0);
        assert_eq!(scheduler.next_deadline(), Some(1));
    }

    #[test]
    fn test_huge_period_never_wraps() {
        let mut scheduler = Scheduler::new(100, u64::MAX);
        scheduler.arm(5);

        // The detection deadline saturates instead of wrapping to the past.
        assert_eq!(run(&mut scheduler, 105), vec![Task::Display]);
        assert_eq!(scheduler.next_deadline(), Some(205));

        assert!(scheduler.begin(Task::Detection));
        scheduler.finish(Task::Detection, 1_000);
        assert_eq!(run(&mut scheduler, 1_000), vec![Task::Display]);
    }
}
