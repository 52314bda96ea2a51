//=========================================================================
// Timer Queue
//=========================================================================
//
// Fire-once deferred callbacks measured in simulation time.
//
// Timers are owned by a scene *activation*, identified by a
// `Generation`. Tearing a scene down does not cancel its timers; the
// host compares generations when a timer comes due and silently drops
// any whose owner is no longer active.
//
// Flow:
//   Scene::init/update → schedule() → TimerQueue
//   SceneHost::tick    → advance(delta) → [FiredTimer] → generation check
//                                                     → Scene::on_timer()
//
//=========================================================================

//=== Identifiers =========================================================

/// Activation counter; bumped by the host every time a scene activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Generation {
        Generation(self.0 + 1)
    }
}

/// Handle returned by [`TimerQueue::schedule`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer that came due during [`TimerQueue::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub owner: Generation,
}

//=== TimerQueue ==========================================================

#[derive(Debug)]
struct Pending {
    id: TimerId,
    owner: Generation,
    due_ms: f64,
}

/// Pending timers ordered by due time.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: f64,
    next_id: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a timer `delay_ms` from now on behalf of `owner`.
    ///
    /// Negative or non-finite delays fire on the next advance.
    pub fn schedule(&mut self, owner: Generation, delay_ms: f64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.pending.push(Pending {
            id,
            owner,
            due_ms: self.now_ms + delay,
        });
        id
    }

    /// Moves time forward and removes every timer now due.
    ///
    /// Returned timers are ordered by due time, ties by scheduling order.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<FiredTimer> {
        self.now_ms += delta_ms.max(0.0);
        let now = self.now_ms;

        let (mut due, waiting): (Vec<Pending>, Vec<Pending>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|timer| timer.due_ms <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)));
        due.into_iter()
            .map(|timer| FiredTimer {
                id: timer.id,
                owner: timer.owner,
            })
            .collect()
    }

    /// Number of timers not yet fired (including orphaned ones).
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Simulation time elapsed since creation.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
