/*
Linear Parameter Ramps
======================

Jumping a gain from 0.2 to 0.8 between two samples puts a step into the
waveform, which is heard as a click. A ramp spreads the change over a fixed
number of samples instead, the same way an envelope stage moves its level:

    increment = (target - current) / ramp_samples

After exactly `ramp_samples` steps the value lands on the target (it is
assigned, not accumulated, so rounding never leaves it slightly off).
*/

#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    increment: f32,
    remaining: u32,
}

impl LinearRamp {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            increment: 0.0,
            remaining: 0,
        }
    }

    /// Jump straight to `value`, cancelling any ramp in flight.
    pub fn set(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.increment = 0.0;
        self.remaining = 0;
    }

    /// Move from the current value to `target` over `samples` samples.
    pub fn ramp_to(&mut self, target: f32, samples: u32) {
        if samples == 0 {
            self.set(target);
            return;
        }
        self.target = target;
        self.increment = (target - self.current) / samples as f32;
        self.remaining = samples;
    }

    #[inline]
    pub fn next_value(&mut self) -> f32 {
        let value = self.current;
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.increment
            };
        }
        value
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_lands_exactly_on_target() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.ramp_to(0.7, 3);
        for _ in 0..3 {
            ramp.next_value();
        }
        assert_eq!(ramp.value(), 0.7);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn ramp_moves_monotonically() {
        let mut ramp = LinearRamp::new(1.0);
        ramp.ramp_to(0.0, 100);
        let mut previous = f32::MAX;
        for _ in 0..100 {
            let value = ramp.next_value();
            assert!(value <= previous);
            previous = value;
        }
        assert_eq!(ramp.next_value(), 0.0);
    }

    #[test]
    fn zero_length_ramp_jumps() {
        let mut ramp = LinearRamp::new(0.2);
        ramp.ramp_to(0.9, 0);
        assert_eq!(ramp.value(), 0.9);
        assert_eq!(ramp.next_value(), 0.9);
    }

    #[test]
    fn set_cancels_ramp() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.ramp_to(1.0, 10);
        ramp.next_value();
        ramp.set(0.5);
        assert!(!ramp.is_ramping());
        assert_eq!(ramp.next_value(), 0.5);
    }
}
