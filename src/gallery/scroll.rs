use std::time::{Duration, Instant};

/// Ease used when the configured one is not a finite number.
pub const DEFAULT_EASE: f64 = 0.05;

/// Quiet period after the last wheel tick before the row snaps to a tile.
pub const SNAP_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Shared scroll state. Only the gallery mutates it; tiles read it every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    pub current: f64,
    pub target: f64,
    pub last: f64,
    pub ease: f64,
    /// Value of `current` when the active drag started.
    pub position: f64,
}

impl ScrollState {
    pub fn new(ease: f64) -> Self {
        let ease = if ease.is_finite() { ease } else { DEFAULT_EASE };
        Self {
            current: 0.0,
            target: 0.0,
            last: 0.0,
            ease: ease.clamp(f64::MIN_POSITIVE, 1.0),
            position: 0.0,
        }
    }

    pub fn step(&mut self) {
        self.current = lerp(self.current, self.target, self.ease);
    }

    pub fn direction(&self) -> Direction {
        if self.current > self.last {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn speed(&self) -> f64 {
        self.current - self.last
    }

    pub fn commit(&mut self) {
        self.last = self.current;
    }

    /// Moves the target onto the nearest multiple of `width`, keeping its sign.
    /// Returns false (and leaves the target alone) when `width` is not positive.
    pub fn snap(&mut self, width: f64) -> bool {
        match snap_target(self.target, width) {
            Some(target) => {
                self.target = target;
                true
            }
            None => false,
        }
    }
}

pub fn snap_target(target: f64, width: f64) -> Option<f64> {
    if !(width > 0.0) || !target.is_finite() {
        return None;
    }
    let index = (target.abs() / width).round();
    Some(if target < 0.0 { -width * index } else { width * index })
}

/// Restartable one-shot timer driven by caller-supplied instants.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    /// True exactly once per quiet period, on the first call at or after the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_converges_without_overshoot() {
        for &(start, target) in &[(0.0, 37.5), (12.0, -8.0), (-3.0, -3.5)] {
            let mut s = ScrollState::new(0.05);
            s.current = start;
            s.target = target;
            let mut prev_gap = (target - start).abs();
            for i in 0..2000 {
                s.step();
                let gap = (target - s.current).abs();
                assert!(gap <= prev_gap, "step {i}: gap grew from {prev_gap} to {gap}");
                assert!(
                    (target - s.current) * (target - start) >= 0.0,
                    "step {i}: overshot {target} (current {})",
                    s.current
                );
                prev_gap = gap;
            }
            assert!(prev_gap < 1e-9, "did not converge: gap {prev_gap}");
        }
    }

    #[test]
    fn non_finite_ease_falls_back_to_default() {
        for ease in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut s = ScrollState::new(ease);
            assert_eq!(s.ease, DEFAULT_EASE, "ease {ease}");
            s.target = 10.0;
            s.step();
            assert!((s.current - 0.5).abs() < 1e-12, "ease {ease}: current {}", s.current);
        }
    }

    #[test]
    fn full_ease_jumps_to_target() {
        let mut s = ScrollState::new(1.0);
        s.target = 4.25;
        s.step();
        assert_eq!(s.current, 4.25);
    }

    #[test]
    fn direction_and_speed_follow_last_frame() {
        let mut s = ScrollState::new(0.5);
        s.target = 10.0;
        s.step();
        assert_eq!(s.direction(), Direction::Right);
        assert!((s.speed() - 5.0).abs() < 1e-12);
        s.commit();
        s.target = 0.0;
        s.step();
        assert_eq!(s.direction(), Direction::Left);
        s.commit();
        // no movement reads as left
        assert_eq!(s.direction(), Direction::Left);
    }

    #[test]
    fn snap_lands_on_multiples_of_width() {
        let width = 7.3;
        for &target in &[0.0, 3.0, 3.7, 14.5, -0.2, -3.7, -22.0, 1000.1] {
            let snapped = snap_target(target, width).expect("positive width");
            let k = snapped / width;
            assert!(
                (k - k.round()).abs() < 1e-9,
                "target {target} snapped to {snapped}, not a multiple of {width}"
            );
            assert!(
                (snapped - target).abs() <= width / 2.0 + 1e-9,
                "target {target} moved too far to {snapped}"
            );
            if snapped != 0.0 {
                assert_eq!(snapped.signum(), target.signum());
            }
        }
    }

    #[test]
    fn snap_ignores_degenerate_width() {
        let mut s = ScrollState::new(0.05);
        s.target = 3.3;
        assert!(!s.snap(0.0));
        assert!(!s.snap(-1.0));
        assert!(!s.snap(f64::NAN));
        assert_eq!(s.target, 3.3);
    }

    #[test]
    fn debounce_fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debounce::new(SNAP_DEBOUNCE);
        assert!(!d.fire_if_due(t0));
        d.poke(t0);
        assert!(!d.fire_if_due(t0 + Duration::from_millis(150)));
        d.poke(t0 + Duration::from_millis(150));
        assert!(!d.fire_if_due(t0 + Duration::from_millis(250)));
        assert!(d.fire_if_due(t0 + Duration::from_millis(350)));
        assert!(!d.fire_if_due(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn cancelled_debounce_never_fires() {
        let t0 = Instant::now();
        let mut d = Debounce::new(SNAP_DEBOUNCE);
        d.poke(t0);
        d.cancel();
        assert!(d.deadline.is_none());
        assert!(!d.fire_if_due(t0 + Duration::from_secs(5)));
    }
}
