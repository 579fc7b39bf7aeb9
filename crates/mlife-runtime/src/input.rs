#![forbid(unsafe_code)]

//! Sources of input events.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event as cte;

use crate::event::Event;

/// Something the controller can drain input from without blocking.
pub trait EventSource {
    /// All events pending right now, oldest first. Never blocks.
    fn drain(&mut self) -> io::Result<Vec<Event>>;
}

impl<E: EventSource + ?Sized> EventSource for Box<E> {
    fn drain(&mut self) -> io::Result<Vec<Event>> {
        (**self).drain()
    }
}

/// Events read from the terminal through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn drain(&mut self) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        while cte::poll(Duration::ZERO)? {
            if let Some(event) = Event::from_crossterm(cte::read()?) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

/// Pre-recorded input: each drain yields the next batch.
///
/// Once the batches run out every drain is empty, or yields a single
/// [`Event::Close`] when built with [`ScriptedEvents::then_close`], so a
/// scripted run always terminates.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    batches: VecDeque<Vec<Event>>,
    close_when_done: bool,
    drains: usize,
}

impl ScriptedEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch delivered by one drain.
    #[must_use]
    pub fn batch(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.batches.push_back(events.into_iter().collect());
        self
    }

    /// Append `n` empty drains.
    #[must_use]
    pub fn idle(mut self, n: usize) -> Self {
        self.batches.extend(std::iter::repeat_with(Vec::new).take(n));
        self
    }

    /// Close once the script is exhausted.
    #[must_use]
    pub fn then_close(mut self) -> Self {
        self.close_when_done = true;
        self
    }

    /// Number of drains so far.
    #[must_use]
    pub const fn drains(&self) -> usize {
        self.drains
    }
}

impl EventSource for ScriptedEvents {
    fn drain(&mut self) -> io::Result<Vec<Event>> {
        self.drains += 1;
        Ok(match self.batches.pop_front() {
            Some(batch) => batch,
            None if self.close_when_done => vec![Event::Close],
            None => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_arrive_one_drain_at_a_time() {
        let mut source = ScriptedEvents::new()
            .batch([Event::char('p'), Event::char('s')])
            .idle(1)
            .batch([Event::char('q')]);
        assert_eq!(source.drain().unwrap().len(), 2);
        assert!(source.drain().unwrap().is_empty());
        assert_eq!(source.drain().unwrap(), vec![Event::char('q')]);
        assert!(source.drain().unwrap().is_empty());
        assert_eq!(source.drains(), 4);
    }

    #[test]
    fn then_close_ends_the_script() {
        let mut source = ScriptedEvents::new().then_close();
        assert_eq!(source.drain().unwrap(), vec![Event::Close]);
        assert_eq!(source.drain().unwrap(), vec![Event::Close]);
    }
}
