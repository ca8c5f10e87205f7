use std::time::{Duration, Instant};

/// Timing of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Produces [`FrameTime`]s. Delta time is clamped to `[100µs, 250ms]` so a
/// stall (debugger, minimized window) does not make a simulation jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(last: Instant) -> Self {
        Self {
            last,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

/// Frames-per-second over fixed reporting windows.
///
/// Feed it every frame; it yields a rate once per elapsed window.
#[derive(Debug, Clone)]
pub struct RateMeter {
    window: Duration,
    started: Option<Instant>,
    frames: u32,
}

impl RateMeter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            started: None,
            frames: 0,
        }
    }

    /// Counts a frame at `now`. Returns the average FPS when a window closes.
    pub fn record(&mut self, now: Instant) -> Option<f32> {
        let started = *self.started.get_or_insert(now);
        self.frames += 1;

        let elapsed = now.saturating_duration_since(started);
        if elapsed < self.window {
            return None;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.started = Some(now);
        self.frames = 0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_both_ways() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);

        let ft = clock.tick_at(t0);
        assert_eq!(ft.dt, Duration::from_micros(100).as_secs_f32());
        assert_eq!(ft.frame_index, 0);

        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert_eq!(ft.dt, 0.25);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn dt_tracks_normal_frames() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn rate_meter_reports_once_per_window() {
        let t0 = Instant::now();
        let mut meter = RateMeter::new(Duration::from_secs(1));
        let step = Duration::from_millis(10);

        let mut reports = Vec::new();
        for i in 0..=200u32 {
            if let Some(fps) = meter.record(t0 + step * i) {
                reports.push(fps);
            }
        }

        assert_eq!(reports.len(), 2);
        // First window counts frames 0..=100 over exactly one second.
        assert!((reports[0] - 101.0).abs() < 0.01);
        assert!((reports[1] - 100.0).abs() < 0.01);
    }
}
