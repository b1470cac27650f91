use crate::capture::camera::{FrameSink, FrameSource};
use gloo_timers::callback::{Interval, Timeout};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const WARM_UP_MS: u32 = 1_000;
pub const SAMPLE_PERIOD_MS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Sent,
    NotReady,
    Dropped,
    Stopped,
}

/// Shared on/off switch checked by every tick.
#[derive(Clone, Default)]
pub struct SampleGate {
    armed: Rc<Cell<bool>>,
}

impl SampleGate {
    /// One sampling attempt. A tick that finds no ready frame is lost; nothing
    /// is queued for later.
    pub fn tick(&self, source: &impl FrameSource, sink: &impl FrameSink) -> SampleOutcome {
        if !self.armed.get() {
            return SampleOutcome::Stopped;
        }
        match source.capture() {
            Some(frame) => {
                if sink.send_frame(frame) {
                    SampleOutcome::Sent
                } else {
                    SampleOutcome::Dropped
                }
            }
            None => SampleOutcome::NotReady,
        }
    }

    fn arm(&self) {
        self.armed.set(true);
    }

    fn disarm(&self) {
        self.armed.set(false);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }
}

/// Warm-up delay followed by a fixed-period tick. Stopping drops both timers,
/// which cancels them, and disarms the gate.
#[derive(Default)]
pub struct SamplingLoop {
    gate: SampleGate,
    warm_up: Option<Timeout>,
    interval: Rc<RefCell<Option<Interval>>>,
}

impl SamplingLoop {
    pub fn start<F>(&mut self, tick: F)
    where
        F: Fn(&SampleGate) + 'static,
    {
        self.stop();
        self.gate.arm();

        let gate = self.gate.clone();
        let interval = self.interval.clone();
        self.warm_up = Some(Timeout::new(WARM_UP_MS, move || {
            if !gate.is_armed() {
                return;
            }
            let tick_gate = gate.clone();
            let handle = Interval::new(SAMPLE_PERIOD_MS, move || tick(&tick_gate));
            interval.borrow_mut().replace(handle);
            log::debug!("Frame sampling started every {SAMPLE_PERIOD_MS}ms");
        }));
    }

    pub fn stop(&mut self) {
        self.gate.disarm();
        self.warm_up.take();
        if self.interval.borrow_mut().take().is_some() {
            log::debug!("Frame sampling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.gate.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeVideo {
        ready: Cell<bool>,
        frames: Cell<u32>,
    }

    impl FakeVideo {
        fn new(ready: bool) -> Self {
            Self {
                ready: Cell::new(ready),
                frames: Cell::new(0),
            }
        }
    }

    impl FrameSource for FakeVideo {
        fn capture(&self) -> Option<String> {
            if !self.ready.get() {
                return None;
            }
            let n = self.frames.get() + 1;
            self.frames.set(n);
            Some(format!("data:image/jpeg;base64,frame{n}"))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: RefCell<Vec<String>>,
    }

    impl FrameSink for RecordingSink {
        fn send_frame(&self, frame: String) -> bool {
            self.sent.borrow_mut().push(frame);
            true
        }
    }

    fn armed_gate() -> SampleGate {
        let gate = SampleGate::default();
        gate.arm();
        gate
    }

    #[test]
    fn unready_video_sends_nothing() {
        let gate = armed_gate();
        let sink = RecordingSink::default();

        assert_eq!(gate.tick(&FakeVideo::new(false), &sink), SampleOutcome::NotReady);
        assert!(sink.sent.borrow().is_empty());
    }

    #[test]
    fn four_ready_ticks_send_four_distinct_frames() {
        let gate = armed_gate();
        let video = FakeVideo::new(true);
        let sink = RecordingSink::default();

        for _ in 0..4 {
            assert_eq!(gate.tick(&video, &sink), SampleOutcome::Sent);
        }

        let sent = sink.sent.borrow();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], "data:image/jpeg;base64,frame1");
        assert_eq!(sent[3], "data:image/jpeg;base64,frame4");
    }

    #[test]
    fn skipped_ticks_are_not_replayed() {
        let gate = armed_gate();
        let video = FakeVideo::new(false);
        let sink = RecordingSink::default();

        gate.tick(&video, &sink);
        gate.tick(&video, &sink);
        video.ready.set(true);
        gate.tick(&video, &sink);

        assert_eq!(sink.sent.borrow().len(), 1);
    }

    #[test]
    fn disarmed_gate_never_reads_the_video() {
        let gate = armed_gate();
        let video = FakeVideo::new(true);
        let sink = RecordingSink::default();

        gate.tick(&video, &sink);
        gate.disarm();

        assert_eq!(gate.tick(&video, &sink), SampleOutcome::Stopped);
        assert_eq!(video.frames.get(), 1);
        assert_eq!(sink.sent.borrow().len(), 1);
    }

    #[test]
    fn refused_send_is_reported() {
        struct ClosedSink;
        impl FrameSink for ClosedSink {
            fn send_frame(&self, _frame: String) -> bool {
                false
            }
        }

        let gate = armed_gate();
        assert_eq!(gate.tick(&FakeVideo::new(true), &ClosedSink), SampleOutcome::Dropped);
    }

    #[test]
    fn stopping_the_loop_silences_its_ticks() {
        let mut sampling = SamplingLoop::default();
        sampling.gate.arm();
        let gate = sampling.gate.clone();
        let video = FakeVideo::new(true);
        let sink = RecordingSink::default();
        assert_eq!(gate.tick(&video, &sink), SampleOutcome::Sent);

        sampling.stop();

        assert!(!sampling.is_running());
        assert_eq!(gate.tick(&video, &sink), SampleOutcome::Stopped);
        assert_eq!(sink.sent.borrow().len(), 1);
    }

    #[test]
    fn idle_loop_is_not_running() {
        let mut sampling = SamplingLoop::default();
        assert!(!sampling.is_running());
        sampling.stop();
        assert!(!sampling.is_running());
    }
}
