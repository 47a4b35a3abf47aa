use crate::config::SkillConfig;

/// Fixed-cadence tick clock driven by frame deltas.
///
/// Ticks are due at `k * interval` for every `k` with `k * interval <
/// duration`. At most one tick fires per frame; a frame longer than the
/// interval delays the backlog instead of bursting it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSchedule {
    interval: f32,
    duration: f32,
    elapsed: f32,
    fired: u32,
}

impl TickSchedule {
    pub fn new(interval: f32, duration: f32) -> Self {
        Self {
            interval,
            duration,
            elapsed: 0.0,
            fired: 0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn fired(&self) -> u32 {
        self.fired
    }

    fn next_tick(&self) -> f32 {
        self.fired as f32 * self.interval
    }

    /// Returns true if the next tick's deadline has been reached.
    pub fn is_due(&self) -> bool {
        let next = self.next_tick();
        self.interval > 0.0
            && next < self.duration - SkillConfig::TIMING_EPSILON
            && self.elapsed + SkillConfig::TIMING_EPSILON >= next
    }

    /// Records one tick.
    pub fn fire(&mut self) {
        self.fired += 1;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + SkillConfig::TIMING_EPSILON >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(interval: f32, duration: f32, dt: f32) -> u32 {
        let mut schedule = TickSchedule::new(interval, duration);
        let mut frames = 0;
        while !schedule.is_finished() && frames < 10_000 {
            if schedule.is_due() {
                schedule.fire();
            }
            schedule.advance(dt);
            frames += 1;
        }
        schedule.fired()
    }

    #[test]
    fn twenty_ticks_at_sixty_fps() {
        assert_eq!(run(0.05, 1.0, 1.0 / 60.0), 20);
    }

    #[test]
    fn tick_count_is_stable_across_frame_rates() {
        for fps in [30.0_f32, 120.0, 144.0, 240.0] {
            let fired = run(0.1, 1.0, 1.0 / fps);
            assert_eq!(fired, 10, "fps {fps}");
        }
    }

    #[test]
    fn first_tick_is_immediate() {
        let schedule = TickSchedule::new(0.5, 1.0);
        assert!(schedule.is_due());
    }

    #[test]
    fn slow_frames_never_burst() {
        // 0.25s frames against a 0.1s interval: one tick per frame at most.
        assert_eq!(run(0.1, 1.0, 0.25), 4);
    }
}
