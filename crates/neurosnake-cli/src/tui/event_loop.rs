use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Renders whenever the state is dirty (after a tick or a terminal event),
/// then waits for the next terminal event until the next tick is due.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` without tick events.
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            dirty: true, // Initial render is required on startup
        }
    }

    /// Sets the tick interval.
    ///
    /// Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Returns the next event.
    ///
    /// A pending render always comes first, so even a zero tick interval
    /// cannot starve drawing or input.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        if self.dirty {
            self.dirty = false;
            return Ok(TuiEvent::Render);
        }

        let has_event = match self.time_until_tick(Instant::now()) {
            Some(timeout) => event::poll(timeout)?,
            None => true,
        };
        self.dirty = true;
        if has_event {
            return Ok(event::read()?.into());
        }
        self.last_tick = Instant::now();
        Ok(TuiEvent::Tick)
    }

    fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.tick_interval
            .map(|interval| (self.last_tick + interval).saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_render() {
        let mut events = EventLoop::new();
        assert!(matches!(events.next().unwrap(), TuiEvent::Render));
    }

    #[test]
    fn test_time_until_tick() {
        let mut events = EventLoop::new();
        let start = events.last_tick;
        assert_eq!(events.time_until_tick(start), None);

        events.set_tick_interval(Some(Duration::from_millis(100)));
        assert_eq!(
            events.time_until_tick(start + Duration::from_millis(30)),
            Some(Duration::from_millis(70))
        );
        assert_eq!(
            events.time_until_tick(start + Duration::from_millis(250)),
            Some(Duration::ZERO)
        );

        events.set_tick_interval(Some(Duration::ZERO));
        assert_eq!(events.time_until_tick(start), Some(Duration::ZERO));
    }
}
