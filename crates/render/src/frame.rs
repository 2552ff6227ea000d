use std::time::Instant;

/// Measures time between frames, capped so a stall (window drag, breakpoint)
/// does not turn into one huge simulation step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self::starting_at(Instant::now(), max_dt)
    }

    pub fn starting_at(start: Instant, max_dt: f32) -> Self {
        Self {
            last_frame: start,
            max_dt,
        }
    }

    /// Seconds since the previous tick, at most `max_dt`.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        elapsed.as_secs_f32().min(self.max_dt)
    }
}

/// Lifecycle of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Init,
    Running,
    /// Close was requested; no further frames are rendered.
    Terminating,
}

impl LoopState {
    /// Enter `Running` once initialization succeeded. No effect in other states.
    pub fn start(&mut self) {
        if *self == Self::Init {
            *self = Self::Running;
        }
    }

    pub fn request_close(&mut self) {
        *self = Self::Terminating;
    }

    pub fn is_running(self) -> bool {
        self == Self::Running
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Terminating
    }
}
