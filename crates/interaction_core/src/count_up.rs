//! One-shot animated counters. A stat starts counting the first time it is
//! visible past the threshold and never again.

use shared::{domain::ElementId, selectors::class};

use crate::{
    dom::Dom,
    handles::StatHandle,
    timers::{ScheduledAction, TimerId, TimerQueue},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CounterTarget {
    pub element: ElementId,
    pub target: i64,
    pub counted: bool,
    current: f64,
    timer: Option<TimerId>,
}

impl CounterTarget {
    fn new(handle: &StatHandle) -> Self {
        Self {
            element: handle.element,
            target: handle.target,
            counted: false,
            current: 0.0,
            timer: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }
}

#[derive(Debug)]
pub struct CountUp {
    counters: Vec<CounterTarget>,
    duration_ms: u64,
    tick_ms: u64,
    threshold: f64,
}

impl CountUp {
    /// `duration_ms` shorter than one tick runs as a single frame.
    pub fn new(stats: &[StatHandle], duration_ms: u64, tick_ms: u64, threshold: f64) -> Self {
        let tick_ms = tick_ms.max(1);
        Self {
            counters: stats.iter().map(CounterTarget::new).collect(),
            duration_ms: duration_ms.max(tick_ms),
            tick_ms,
            threshold,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.counters.is_empty()
    }

    pub fn counter(&self, element: ElementId) -> Option<&CounterTarget> {
        self.counters.iter().find(|counter| counter.element == element)
    }

    /// Returns true when this call started the animation.
    pub fn on_visibility<D: Dom + ?Sized>(
        &mut self,
        element: ElementId,
        ratio: f64,
        dom: &mut D,
        timers: &mut TimerQueue,
    ) -> bool {
        if ratio < self.threshold {
            return false;
        }
        let tick_ms = self.tick_ms;
        let Some(counter) = self
            .counters
            .iter_mut()
            .find(|counter| counter.element == element)
        else {
            return false;
        };
        if counter.counted {
            return false;
        }

        counter.counted = true;
        counter.current = 0.0;
        dom.add_class(element, class::COUNTED);
        counter.timer = Some(timers.schedule_repeating(
            tick_ms,
            ScheduledAction::CountTick { stat: element },
        ));
        tracing::debug!(stat = element.0, target = counter.target, "count-up started");
        true
    }

    /// Advances one frame; returns true once the final value is shown.
    pub fn tick<D: Dom + ?Sized>(
        &mut self,
        element: ElementId,
        dom: &mut D,
        timers: &mut TimerQueue,
    ) -> bool {
        let increment = self.increment_for(element);
        let Some(counter) = self
            .counters
            .iter_mut()
            .find(|counter| counter.element == element)
        else {
            return true;
        };
        let Some(timer) = counter.timer else {
            return true;
        };

        let target = counter.target as f64;
        counter.current += increment;
        if counter.current >= target {
            dom.set_text(element, &counter.target.to_string());
            timers.cancel(timer);
            counter.timer = None;
            tracing::debug!(stat = element.0, "count-up finished");
            true
        } else {
            dom.set_text(element, &(counter.current.floor() as i64).to_string());
            false
        }
    }

    pub fn stop_all(&mut self, timers: &mut TimerQueue) {
        for counter in &mut self.counters {
            if let Some(timer) = counter.timer.take() {
                timers.cancel(timer);
            }
        }
    }

    fn increment_for(&self, element: ElementId) -> f64 {
        let frames = self.duration_ms as f64 / self.tick_ms as f64;
        self.counter(element)
            .map_or(0.0, |counter| counter.target as f64 / frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    fn run(count_up: &mut CountUp, dom: &mut MemoryDom, timers: &mut TimerQueue, until_ms: u64) {
        while let Some((_, action)) = timers.pop_due(until_ms) {
            if let ScheduledAction::CountTick { stat } = action {
                count_up.tick(stat, dom, timers);
            }
        }
        timers.set_now(until_ms);
    }

    fn setup(target: i64) -> (MemoryDom, CountUp, TimerQueue, ElementId) {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let element = dom
            .append(body, "span")
            .class("c-stat__number")
            .attr("data-count", &target.to_string())
            .id();
        let count_up = CountUp::new(&[StatHandle { element, target }], 2000, 16, 0.5);
        (dom, count_up, TimerQueue::new(), element)
    }

    #[test]
    fn counts_to_exact_target_and_stops() {
        let (mut dom, mut count_up, mut timers, stat) = setup(50);

        assert!(count_up.on_visibility(stat, 0.6, &mut dom, &mut timers));
        run(&mut count_up, &mut dom, &mut timers, 1000);
        let midway: i64 = dom.text(stat).parse().expect("numeric text");
        assert!(midway > 0 && midway < 50, "midway value {midway}");

        run(&mut count_up, &mut dom, &mut timers, 2500);
        assert_eq!(dom.text(stat), "50");
        assert!(timers.is_empty());
        assert!(!count_up.counter(stat).expect("counter").is_running());
    }

    #[test]
    fn intermediate_values_are_floored() {
        let (mut dom, mut count_up, mut timers, stat) = setup(10);
        count_up.on_visibility(stat, 1.0, &mut dom, &mut timers);
        run(&mut count_up, &mut dom, &mut timers, 16);
        assert_eq!(dom.text(stat), "0");
    }

    #[test]
    fn fires_once_despite_repeated_visibility() {
        let (mut dom, mut count_up, mut timers, stat) = setup(50);

        assert!(!count_up.on_visibility(stat, 0.2, &mut dom, &mut timers));
        assert!(count_up.on_visibility(stat, 0.5, &mut dom, &mut timers));
        assert!(!count_up.on_visibility(stat, 0.9, &mut dom, &mut timers));
        assert_eq!(timers.len(), 1);

        run(&mut count_up, &mut dom, &mut timers, 3000);
        assert!(!count_up.on_visibility(stat, 1.0, &mut dom, &mut timers));
        assert!(timers.is_empty());
        assert_eq!(dom.text(stat), "50");
        assert!(dom.has_class(stat, "counted"));
    }

    #[test]
    fn zero_and_negative_targets_terminate() {
        for target in [0, -5] {
            let (mut dom, mut count_up, mut timers, stat) = setup(target);
            count_up.on_visibility(stat, 1.0, &mut dom, &mut timers);
            run(&mut count_up, &mut dom, &mut timers, 16);
            assert_eq!(dom.text(stat), target.to_string());
            assert!(timers.is_empty());
        }
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        for target in [0, 50] {
            let mut dom = MemoryDom::default();
            let body = dom.body();
            let stat = dom.append(body, "span").id();
            let mut count_up = CountUp::new(&[StatHandle { element: stat, target }], 0, 16, 0.5);
            let mut timers = TimerQueue::new();

            assert!(count_up.on_visibility(stat, 1.0, &mut dom, &mut timers));
            run(&mut count_up, &mut dom, &mut timers, 16);

            assert_eq!(dom.text(stat), target.to_string());
            assert!(timers.is_empty());
        }
    }
}
