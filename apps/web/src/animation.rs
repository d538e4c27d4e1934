use tech_radar_engine::Transitions;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockMode {
    Running,
    Disabled,
}

/// Longest frame gap counted in full; a backgrounded tab resumes where it
/// left off instead of jumping to the settled chart.
const MAX_FRAME_DELTA_MS: f64 = 250.0;

/// Entrance time accumulated from animation frames.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TransitionClock {
    elapsed_ms: f64,
    last_tick: Option<f64>,
    mode: ClockMode,
}

impl TransitionClock {
    pub const fn new(mode: ClockMode) -> Self {
        Self {
            elapsed_ms: 0.0,
            last_tick: None,
            mode,
        }
    }

    pub const fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Starts the entrance over, e.g. for a freshly laid out scene.
    pub fn restart(&mut self) {
        self.elapsed_ms = 0.0;
        self.last_tick = None;
    }

    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            ClockMode::Running => ClockMode::Disabled,
            ClockMode::Disabled => ClockMode::Running,
        };
        self.restart();
    }

    /// Advances by the time since the previous frame, clamped.
    pub fn tick(&mut self, now_ms: f64) {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS));

        self.elapsed_ms += delta;
        self.last_tick = Some(now_ms);
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms.min(f64::from(u32::MAX)) as u32
    }

    /// The entrance frame to draw; `Off` once `settle_ms` has passed.
    pub fn transitions(&self, settle_ms: u32) -> Transitions {
        match self.mode {
            ClockMode::Disabled => Transitions::Off,
            ClockMode::Running if self.elapsed_ms() >= settle_ms => Transitions::Off,
            ClockMode::Running => Transitions::At(self.elapsed_ms()),
        }
    }
}
