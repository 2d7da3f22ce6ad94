//! Virtual-time timer queue standing in for `setTimeout`/`setInterval`.
//! Due timers fire earliest-deadline first, ties in scheduling order.

use shared::domain::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledAction {
    CloseNav,
    CompleteSubmit { form: ElementId },
    CountTick { stat: ElementId },
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    due_ms: u64,
    seq: u64,
    interval_ms: Option<u64>,
    action: ScheduledAction,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule_once(&mut self, delay_ms: u64, action: ScheduledAction) -> TimerId {
        self.push(delay_ms, None, action)
    }

    pub fn schedule_repeating(&mut self, interval_ms: u64, action: ScheduledAction) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.push(interval_ms, Some(interval_ms), action)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        before != self.timers.len()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|timer| timer.due_ms).min()
    }

    /// Pops the next timer due at or before `until_ms`, moving the clock to
    /// its deadline. Repeating timers are re-armed before returning.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, ScheduledAction)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= until_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.seq))
            .map(|(index, _)| index)?;

        let timer = &mut self.timers[index];
        self.now_ms = self.now_ms.max(timer.due_ms);
        let id = timer.id;
        let action = timer.action.clone();
        let interval_ms = timer.interval_ms;

        match interval_ms {
            Some(interval) => {
                timer.due_ms += interval;
                timer.seq = self.next_seq;
                self.next_seq += 1;
            }
            None => {
                self.timers.remove(index);
            }
        }

        Some((id, action))
    }

    /// Moves the clock forward without firing anything.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn push(&mut self, delay_ms: u64, interval_ms: Option<u64>, action: ScheduledAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            seq: self.next_seq,
            interval_ms,
            action,
        });
        self.next_seq += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut TimerQueue, until_ms: u64) -> Vec<ScheduledAction> {
        let mut fired = Vec::new();
        while let Some((_, action)) = queue.pop_due(until_ms) {
            fired.push(action);
        }
        queue.set_now(until_ms);
        fired
    }

    #[test]
    fn fires_in_deadline_then_fifo_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_once(300, ScheduledAction::CloseNav);
        queue.schedule_once(100, ScheduledAction::CompleteSubmit { form: ElementId(1) });
        queue.schedule_once(300, ScheduledAction::CountTick { stat: ElementId(2) });

        assert!(drain(&mut queue, 99).is_empty());
        assert_eq!(
            drain(&mut queue, 300),
            vec![
                ScheduledAction::CompleteSubmit { form: ElementId(1) },
                ScheduledAction::CloseNav,
                ScheduledAction::CountTick { stat: ElementId(2) },
            ]
        );
        assert!(queue.is_empty());
        assert_eq!(queue.now_ms(), 300);
    }

    #[test]
    fn repeating_timer_rearms_until_cancelled() {
        let mut queue = TimerQueue::new();
        let tick = queue.schedule_repeating(16, ScheduledAction::CountTick { stat: ElementId(7) });

        assert_eq!(drain(&mut queue, 64).len(), 4);
        assert!(queue.is_scheduled(tick));
        assert_eq!(queue.next_deadline(), Some(80));

        assert!(queue.cancel(tick));
        assert!(!queue.cancel(tick));
        assert!(drain(&mut queue, 1_000).is_empty());
    }

    #[test]
    fn delays_are_relative_to_current_clock() {
        let mut queue = TimerQueue::new();
        queue.set_now(500);
        queue.schedule_once(300, ScheduledAction::CloseNav);
        assert_eq!(queue.next_deadline(), Some(800));
    }
}
