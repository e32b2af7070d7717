/// Countdown for timed uses.
///
/// `advance` reports completion exactly once; the meter is idle afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressMeter {
    duration: f32,
    elapsed: f32,
    running: bool,
}

impl ProgressMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Completed share in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.duration <= f32::EPSILON {
            return if self.running { 0.0 } else { 1.0 };
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Adds `dt` seconds. Returns true on the tick the duration is reached.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed + f32::EPSILON >= self.duration {
            self.running = false;
            return true;
        }
        false
    }
}
