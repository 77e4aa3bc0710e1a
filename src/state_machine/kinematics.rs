use std::time::Instant;

/// The simulated hardware of one axis: position, velocity, soft limits and motion flags.
///
/// Positions are raw integer counts and velocity is counts per second. Time is never read from
/// the system; every operation that depends on it takes the current [`Instant`] as an argument.
///
/// After every [`advance`](Self::advance) and every command the position lies inside
/// `[limit_low, limit_high]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    position: i32,
    velocity: f64,
    limit_low: i32,
    limit_high: i32,
    limit_low_hit: bool,
    limit_high_hit: bool,
    moving: bool,
    remaining: i64,
    // Sub-count travel carried between updates so slow velocities still make progress.
    residue: f64,
    last_update: Option<Instant>,
}

impl AxisState {
    /// Create an idle axis at position zero, or at the nearest limit when zero is out of range.
    pub fn new(limit_low: i32, limit_high: i32) -> Self {
        let mut state = Self {
            position: 0,
            velocity: 0.0,
            limit_low,
            limit_high,
            limit_low_hit: false,
            limit_high_hit: false,
            moving: false,
            remaining: 0,
            residue: 0.0,
            last_update: None,
        };
        state.place(0);
        state
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn limit_low(&self) -> i32 {
        self.limit_low
    }

    pub fn limit_high(&self) -> i32 {
        self.limit_high
    }

    pub fn limit_low_hit(&self) -> bool {
        self.limit_low_hit
    }

    pub fn limit_high_hit(&self) -> bool {
        self.limit_high_hit
    }

    /// Advance the motion by the wall-clock time elapsed since the previous update.
    ///
    /// Does nothing while idle. Travel never exceeds the remaining distance of the current move
    /// and never leaves the soft limits; reaching either ends the move. A clock that went
    /// backwards is treated as zero elapsed time.
    pub fn advance(&mut self, now: Instant) {
        if !self.moving {
            return;
        }

        let elapsed = self
            .last_update
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        self.last_update = Some(now);

        // Direction always follows the remaining distance, even if it changed mid-move.
        let speed = self.velocity.abs() * self.remaining.signum() as f64;
        let travel = self.residue + elapsed * speed;

        let step = if travel.abs() >= self.remaining.unsigned_abs() as f64 {
            self.moving = false;
            self.residue = 0.0;
            self.remaining
        } else {
            let whole = travel.trunc();
            self.residue = travel - whole;
            whole as i64
        };
        self.remaining = self.remaining.saturating_sub(step);

        let target = i64::from(self.position).saturating_add(step);
        if self.place(target) {
            self.moving = false;
            self.remaining = 0;
            self.residue = 0.0;
        }
    }

    /// Set the distance to travel so that the move ends at `target`.
    pub fn move_absolute(&mut self, target: i64) {
        self.retarget(target.saturating_sub(i64::from(self.position)));
    }

    /// Set the distance to travel relative to the current position.
    pub fn move_relative(&mut self, delta: i64) {
        self.retarget(delta);
    }

    /// Overwrite the position counter without moving.
    ///
    /// Values outside the soft limits are pinned to the nearest limit.
    pub fn load_position(&mut self, position: i64) {
        self.place(position);
    }

    /// Store the commanded velocity; its sign is re-derived by [`go`](Self::go).
    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    /// Begin travelling the remaining distance at the commanded speed.
    ///
    /// A no-op when there is nothing to travel or the velocity is zero.
    pub fn go(&mut self, now: Instant) {
        if self.remaining == 0 || self.velocity == 0.0 {
            return;
        }

        self.velocity = self.velocity.abs() * self.remaining.signum() as f64;
        self.moving = true;
        self.residue = 0.0;
        self.last_update = Some(now);
    }

    /// Abandon the current move where it is.
    pub fn stop(&mut self) {
        if !self.moving {
            return;
        }

        self.moving = false;
        self.remaining = 0;
        self.residue = 0.0;
    }

    fn retarget(&mut self, remaining: i64) {
        self.remaining = remaining;
        // A new target at the current position ends a move in progress.
        if remaining == 0 {
            self.moving = false;
            self.residue = 0.0;
        }
    }

    /// Move the counter to `position` clamped into the limits and refresh the limit flags.
    ///
    /// Returns whether the position had to be clamped.
    fn place(&mut self, position: i64) -> bool {
        let low = i64::from(self.limit_low);
        let high = i64::from(self.limit_high);
        let clamped = position.clamp(low.min(high), high.max(low));

        // Limits are validated as ordered at registration, so this fits in an i32.
        self.position = clamped as i32;
        self.limit_low_hit = self.position == self.limit_low;
        self.limit_high_hit = self.position == self.limit_high;

        clamped != position
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_initial_state() {
        let state = AxisState::new(-100, 100);

        assert_eq!(state.position(), 0);
        assert_eq!(state.remaining(), 0);
        assert_eq!(state.velocity(), 0.0);
        assert!(!state.is_moving());
        assert!(!state.limit_low_hit());
        assert!(!state.limit_high_hit());
    }

    #[test]
    fn test_initial_position_pinned_into_limits() {
        let state = AxisState::new(10, 20);

        assert_eq!(state.position(), 10);
        assert!(state.limit_low_hit());
    }

    #[test]
    fn test_idle_advance_does_nothing() {
        let base = Instant::now();
        let mut state = AxisState::new(-100, 100);
        state.move_relative(50);
        state.set_velocity(10.0);

        state.advance(at(base, 10_000));

        assert_eq!(state.position(), 0);
        assert_eq!(state.remaining(), 50);
    }

    #[test]
    fn test_no_overshoot() {
        let base = Instant::now();
        let mut state = AxisState::new(-100, 100);
        state.move_relative(50);
        state.set_velocity(10.0);
        state.go(base);

        // 0.7s steps; the move needs 5s at 10 counts/s
        for tick in 1..=10 {
            state.advance(at(base, tick * 700));
            assert!(state.position() <= 50);
        }

        assert_eq!(state.position(), 50);
        assert_eq!(state.remaining(), 0);
        assert!(!state.is_moving());
    }

    #[test]
    fn test_partial_progress() {
        let base = Instant::now();
        let mut state = AxisState::new(-100, 100);
        state.move_relative(50);
        state.set_velocity(10.0);
        state.go(base);

        state.advance(at(base, 2_000));

        assert_eq!(state.position(), 20);
        assert_eq!(state.remaining(), 30);
        assert!(state.is_moving());
    }

    #[test]
    fn test_slow_velocity_accumulates() {
        let base = Instant::now();
        let mut state = AxisState::new(-100, 100);
        state.move_relative(10);
        state.set_velocity(1.0);
        state.go(base);

        // Each 100ms tick only covers a tenth of a count.
        for tick in 1..=25 {
            state.advance(at(base, tick * 100));
        }

        assert_eq!(state.position(), 2);
        assert!(state.is_moving());
    }

    #[test]
    fn test_negative_move_derives_direction() {
        let base = Instant::now();
        let mut state = AxisState::new(-100, 100);
        state.move_absolute(-30);
        state.set_velocity(15.0);
        state.go(base);

        assert_eq!(state.velocity(), -15.0);

        state.advance(at(base, 1_000));
        assert_eq!(state.position(), -15);

        state.advance(at(base, 5_000));
        assert_eq!(state.position(), -30);
        assert!(!state.is_moving());
    }

    #[test]
    fn test_limit_clamp() {
        let base = Instant::now();
        let mut state = AxisState::new(-10, 10);
        state.move_absolute(100);
        state.set_velocity(50.0);
        state.go(base);

        state.advance(at(base, 10_000));

        assert_eq!(state.position(), 10);
        assert!(state.limit_high_hit());
        assert!(!state.limit_low_hit());
        assert!(!state.is_moving());
        assert_eq!(state.remaining(), 0);
    }

    #[test]
    fn test_low_limit_clamp() {
        let base = Instant::now();
        let mut state = AxisState::new(-10, 10);
        state.move_relative(-1_000);
        state.set_velocity(100.0);
        state.go(base);

        state.advance(at(base, 500));

        assert_eq!(state.position(), -10);
        assert!(state.limit_low_hit());
        assert!(!state.is_moving());
    }

    #[test]
    fn test_leaving_limit_clears_flag() {
        let base = Instant::now();
        let mut state = AxisState::new(-10, 10);
        state.load_position(10);
        assert!(state.limit_high_hit());

        state.move_relative(-5);
        state.set_velocity(5.0);
        state.go(base);
        state.advance(at(base, 1_000));

        assert_eq!(state.position(), 5);
        assert!(!state.limit_high_hit());
    }

    #[test]
    fn test_degenerate_limits_set_both_flags() {
        let state = AxisState::new(0, 0);

        assert!(state.limit_low_hit());
        assert!(state.limit_high_hit());
    }

    #[test]
    fn test_go_without_distance_or_velocity_is_noop() {
        let base = Instant::now();
        let mut state = AxisState::new(-100, 100);

        state.set_velocity(10.0);
        state.go(base);
        assert!(!state.is_moving());

        state.set_velocity(0.0);
        state.move_relative(5);
        state.go(base);
        assert!(!state.is_moving());
    }

    #[test]
    fn test_stop_abandons_motion() {
        let base = Instant::now();
        let mut state = AxisState::new(-100, 100);
        state.move_relative(50);
        state.set_velocity(10.0);
        state.go(base);
        state.advance(at(base, 1_500));
        let stopped_at = state.position();

        state.stop();
        state.advance(at(base, 4_000));

        assert_eq!(state.position(), stopped_at);
        assert_eq!(state.remaining(), 0);
        assert!(!state.is_moving());
    }

    #[test]
    fn test_clock_going_backwards_is_clamped() {
        let base = Instant::now() + Duration::from_secs(60);
        let mut state = AxisState::new(-100, 100);
        state.move_relative(50);
        state.set_velocity(10.0);
        state.go(base);

        state.advance(base - Duration::from_secs(30));

        assert_eq!(state.position(), 0);
        assert!(state.is_moving());
    }

    #[test]
    fn test_load_position_clamps() {
        let mut state = AxisState::new(-10, 10);

        state.load_position(-500);

        assert_eq!(state.position(), -10);
        assert!(state.limit_low_hit());
    }

    #[test]
    fn test_extreme_distances_do_not_overflow() {
        let base = Instant::now();
        let mut state = AxisState::new(i32::MIN, i32::MAX);
        state.move_relative(i64::MIN);
        state.set_velocity(10.0);
        state.go(base);

        state.advance(at(base, 1_000));

        assert_eq!(state.position(), -10);
        assert!(state.is_moving());

        state.load_position(5);
        state.move_relative(i64::MAX);
        state.set_velocity(1e20);
        state.go(at(base, 1_000));

        state.advance(at(base, 2_000));

        assert_eq!(state.position(), i32::MAX);
        assert!(state.limit_high_hit());
        assert!(!state.is_moving());
    }

    #[test]
    fn test_unbounded_travel_ends_move() {
        let base = Instant::now();
        let mut state = AxisState::new(-10, 10);
        state.move_relative(-7);
        state.set_velocity(f64::MAX);
        state.go(base);

        state.advance(at(base, 5_000));

        assert_eq!(state.position(), -7);
        assert_eq!(state.remaining(), 0);
        assert!(!state.is_moving());
    }
}
