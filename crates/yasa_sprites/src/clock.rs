use std::fmt;

use derive_more::{Constructor, Deref};
use log::trace;
use strum::Display;

use crate::{animation::AnimationSequence, frame::SpriteFrame};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum AnimationEventKind {
    FirstFrame,
    NewFrame,
    LastFrame,
    Pause,
    Resume,
}

/// Sent to listeners after the clock state has been updated,
/// so `index` and `frame` always describe the current frame.
#[derive(Debug, Clone, Copy)]
pub struct AnimationEvent<'a> {
    pub kind: AnimationEventKind,
    pub index: usize,
    pub frame: &'a SpriteFrame,
    pub animation: &'a str,
}

/// Receives clock events. Every method does nothing by default, so a
/// listener only overrides what it is interested in.
pub trait AnimationListener {
    fn on_first_frame(&mut self, _event: &AnimationEvent) {}
    fn on_new_frame(&mut self, _event: &AnimationEvent) {}
    fn on_last_frame(&mut self, _event: &AnimationEvent) {}
    fn on_pause(&mut self, _event: &AnimationEvent) {}
    fn on_resume(&mut self, _event: &AnimationEvent) {}

    fn on_event(&mut self, event: &AnimationEvent) {
        match event.kind {
            AnimationEventKind::FirstFrame => self.on_first_frame(event),
            AnimationEventKind::NewFrame => self.on_new_frame(event),
            AnimationEventKind::LastFrame => self.on_last_frame(event),
            AnimationEventKind::Pause => self.on_pause(event),
            AnimationEventKind::Resume => self.on_resume(event),
        }
    }
}

impl<F: FnMut(&AnimationEvent)> AnimationListener for F {
    fn on_event(&mut self, event: &AnimationEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Constructor)]
pub struct ListenerId(u64);

/// Advances an [AnimationSequence] by elapsed time, using the duration of
/// each frame, and notifies listeners about frame changes.
///
/// Time is accumulated and drained frame by frame, so a long update skips
/// as many frames as it covers and the remainder carries over.
#[derive(Deref)]
pub struct AnimationClock {
    #[deref]
    sequence: AnimationSequence,
    /// Milliseconds spent on the current frame
    elapsed: f64,
    speed: f64,
    reversed: bool,
    paused: bool,
    listeners: Vec<(ListenerId, Box<dyn AnimationListener>)>,
    next_listener: u64,
}

impl fmt::Debug for AnimationClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationClock")
            .field("animation", &self.sequence.name())
            .field("index", &self.sequence.index())
            .field("elapsed", &self.elapsed)
            .field("speed", &self.speed)
            .field("reversed", &self.reversed)
            .field("paused", &self.paused)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl AnimationClock {
    pub fn new(sequence: AnimationSequence) -> Self {
        Self {
            sequence,
            elapsed: 0.,
            speed: 1.,
            reversed: false,
            paused: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn sequence_mut(&mut self) -> &mut AnimationSequence {
        &mut self.sequence
    }

    pub fn into_sequence(self) -> AnimationSequence {
        self.sequence
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Playback speed multiplier, negative values are treated as 0.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = match speed.is_finite() {
            true => speed.max(0.),
            false => 0.,
        };
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Always notifies listeners, even when the state does not change.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.emit(match paused {
            true => AnimationEventKind::Pause,
            false => AnimationEventKind::Resume,
        });
    }

    pub fn add_listener(&mut self, listener: impl AnimationListener + 'static) -> ListenerId {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if no listener with this id is attached.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let len = self.listeners.len();
        self.listeners.retain(|(i, _)| *i != id);
        self.listeners.len() != len
    }

    /// Moves to the entry frame of the playback direction, the last frame
    /// when reversed and the first one otherwise.
    pub fn reset(&mut self) {
        self.elapsed = 0.;
        match self.reversed {
            true => {
                self.sequence.set_index(self.sequence.len() - 1);
                self.emit(AnimationEventKind::LastFrame);
            }
            false => {
                self.sequence.set_index(0);
                self.emit(AnimationEventKind::FirstFrame);
            }
        }
    }

    /// Advances the clock by `delta` seconds of real time.
    /// Paused clocks, as well as negative or non finite deltas, are ignored.
    pub fn update(&mut self, delta: f64) {
        if self.paused || !delta.is_finite() || delta <= 0. {
            return;
        }

        self.elapsed += delta * self.speed * 1000.;

        // Frames without duration can't drain time, they would loop forever
        if self.sequence.frames().iter().all(|f| f.duration == 0) {
            self.elapsed = 0.;
            return;
        }

        loop {
            let duration = self.sequence.current_frame().duration as f64;
            if self.elapsed < duration {
                break;
            }

            self.elapsed -= duration;
            self.step();
        }
    }

    fn step(&mut self) {
        let len = self.sequence.len();
        let index = self.sequence.index();

        let (next, kind) = match self.reversed {
            true => match index {
                0 => (len - 1, AnimationEventKind::FirstFrame),
                1 => (0, AnimationEventKind::LastFrame),
                _ => (index - 1, AnimationEventKind::NewFrame),
            },
            false => match index {
                i if i + 1 == len => (0, AnimationEventKind::FirstFrame),
                i if i + 2 == len => (i + 1, AnimationEventKind::LastFrame),
                _ => (index + 1, AnimationEventKind::NewFrame),
            },
        };

        self.sequence.set_index(next);
        self.emit(kind);
    }

    /// Notifies every listener. Reaching the first or the last frame is
    /// still a new frame, so those are followed by a `NewFrame` event.
    fn emit(&mut self, kind: AnimationEventKind) {
        self.dispatch(kind);

        if matches!(
            kind,
            AnimationEventKind::FirstFrame | AnimationEventKind::LastFrame
        ) {
            self.dispatch(AnimationEventKind::NewFrame);
        }
    }

    fn dispatch(&mut self, kind: AnimationEventKind) {
        let event = AnimationEvent {
            kind,
            index: self.sequence.index(),
            frame: self.sequence.current_frame(),
            animation: self.sequence.name(),
        };

        trace!("Animation '{}': {kind} at frame {}", event.animation, event.index);

        for (_, listener) in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use float_cmp::approx_eq;

    use super::*;
    use crate::animation::tests::sequence;

    type Log = Rc<RefCell<Vec<(AnimationEventKind, usize)>>>;

    fn clock(durations: &[u32]) -> (AnimationClock, Log) {
        let mut clock = AnimationClock::new(sequence(durations));
        let log = Log::default();
        let sink = log.clone();
        clock.add_listener(move |e: &AnimationEvent| sink.borrow_mut().push((e.kind, e.index)));
        (clock, log)
    }

    fn take(log: &Log) -> Vec<(AnimationEventKind, usize)> {
        log.borrow_mut().drain(..).collect()
    }

    use AnimationEventKind::*;

    #[test]
    fn test_update_advances_and_carries_remainder() {
        let (mut clock, log) = clock(&[100, 100, 100]);

        clock.update(0.25);

        assert_eq!(clock.index(), 2);
        assert!(approx_eq!(f64, clock.elapsed(), 50., epsilon = 1e-9));
        assert_eq!(take(&log), [(NewFrame, 1), (LastFrame, 2), (NewFrame, 2)]);
    }

    #[test]
    fn test_wrap_to_first_frame() {
        let (mut clock, log) = clock(&[100, 100, 100]);

        clock.update(0.3);

        assert_eq!(clock.index(), 0);
        assert!(approx_eq!(f64, clock.elapsed(), 0., epsilon = 1e-9));
        assert_eq!(
            take(&log),
            [
                (NewFrame, 1),
                (LastFrame, 2),
                (NewFrame, 2),
                (FirstFrame, 0),
                (NewFrame, 0)
            ]
        );
    }

    #[test]
    fn test_reversed_playback() {
        let (mut clock, log) = clock(&[100, 100, 100]);
        clock.set_reversed(true);

        clock.update(0.1);
        assert_eq!(clock.index(), 2);
        clock.update(0.1);
        assert_eq!(clock.index(), 1);
        clock.update(0.1);
        assert_eq!(clock.index(), 0);

        assert_eq!(
            take(&log),
            [
                (FirstFrame, 2),
                (NewFrame, 2),
                (NewFrame, 1),
                (LastFrame, 0),
                (NewFrame, 0)
            ]
        );
    }

    #[test]
    fn test_speed_scales_time() {
        let (mut clock, _) = clock(&[100, 100, 100]);

        clock.set_speed(2.);
        clock.update(0.075);
        assert_eq!(clock.index(), 1);
        assert!(approx_eq!(f64, clock.elapsed(), 50., epsilon = 1e-9));

        clock.set_speed(-3.);
        assert_eq!(clock.speed(), 0.);
        clock.update(10.);
        assert_eq!(clock.index(), 1);
    }

    #[test]
    fn test_paused_clock_does_not_advance() {
        let (mut clock, log) = clock(&[100, 100]);

        clock.set_paused(true);
        clock.set_paused(true);
        clock.update(1.);
        assert_eq!(clock.index(), 0);
        assert!(clock.is_paused());

        clock.set_paused(false);
        assert_eq!(take(&log), [(Pause, 0), (Pause, 0), (Resume, 0)]);
    }

    #[test]
    fn test_reset_depends_on_direction() {
        let (mut clock, log) = clock(&[100, 100, 100]);
        clock.update(0.15);

        clock.set_reversed(true);
        clock.reset();
        assert_eq!(clock.index(), 2);
        assert_eq!(clock.elapsed(), 0.);

        clock.set_reversed(false);
        clock.reset();
        assert_eq!(clock.index(), 0);

        let events = take(&log);
        assert_eq!(
            &events[1..],
            [(LastFrame, 2), (NewFrame, 2), (FirstFrame, 0), (NewFrame, 0)]
        );
    }

    #[test]
    fn test_invalid_deltas_are_ignored() {
        let (mut clock, log) = clock(&[100, 100]);

        clock.update(-1.);
        clock.update(f64::NAN);
        clock.update(f64::INFINITY);

        assert_eq!(clock.elapsed(), 0.);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn test_zero_duration_frames_do_not_loop() {
        let (mut clock, log) = clock(&[0, 0]);
        clock.update(1.);
        assert_eq!(clock.index(), 0);
        assert!(take(&log).is_empty());

        let (mut clock, _) = self::clock(&[0, 100]);
        clock.update(0.05);
        assert_eq!(clock.index(), 1);
    }

    #[test]
    fn test_listener_removal_and_defaults() {
        #[derive(Default)]
        struct LastFrames(Rc<RefCell<usize>>);

        impl AnimationListener for LastFrames {
            fn on_last_frame(&mut self, _event: &AnimationEvent) {
                *self.0.borrow_mut() += 1;
            }
        }

        let (mut clock, log) = clock(&[10, 10]);
        let count = Rc::new(RefCell::new(0));
        let id = clock.add_listener(LastFrames(count.clone()));

        clock.update(0.01);
        assert_eq!(*count.borrow(), 1);

        assert!(clock.remove_listener(id));
        assert!(!clock.remove_listener(id));
        clock.update(0.02);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(take(&log).len(), 6);
    }
}
