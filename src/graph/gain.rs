use crate::{dsp::ramp::LinearRamp, graph::node::Modulatable};

/// The single summing point every layer feeds, with a ramped level.
///
/// Output gain is `level × breath`. `level` is the session volume (ramped);
/// `breath` is a unit scale that master-gain modulation swings around 1.0,
/// so a muted or faded-out master stays silent while it breathes.
#[derive(Debug, Clone)]
pub struct MasterGain {
    level: LinearRamp,
    breath: f32,
    inputs: usize,
}

impl MasterGain {
    pub fn new(inputs: usize) -> Self {
        Self {
            level: LinearRamp::new(1.0),
            breath: 1.0,
            inputs,
        }
    }

    /// Number of layers summed into this gain.
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Current output gain, breathing included.
    pub fn value(&self) -> f32 {
        self.level.value() * self.breath
    }

    /// Current volume level (mid-ramp values included), without breathing.
    pub fn level(&self) -> f32 {
        self.level.value()
    }

    /// Scale applied on top of the level by master modulation.
    pub fn breath(&self) -> f32 {
        self.breath
    }

    /// Level the gain is heading to.
    pub fn target(&self) -> f32 {
        self.level.target()
    }

    pub fn set(&mut self, level: f32) {
        self.level.set(level.max(0.0));
    }

    pub fn ramp_to(&mut self, level: f32, frames: u32) {
        self.level.ramp_to(level.max(0.0), frames);
    }

    /// Scale a planar block in place, one ramp step per frame.
    pub fn process(&mut self, planar: &mut [f32], frames: usize) {
        if frames == 0 {
            return;
        }
        let breath = self.breath;
        if !self.level.is_ramping() {
            let gain = self.level.value() * breath;
            planar.iter_mut().for_each(|s| *s *= gain);
            return;
        }
        for frame in 0..frames {
            let gain = self.level.next_value() * breath;
            for channel in planar.chunks_exact_mut(frames) {
                channel[frame] *= gain;
            }
        }
    }
}

impl Modulatable for MasterGain {
    type Param = ();

    fn get_param(&self, _param: ()) -> f32 {
        1.0
    }

    fn apply_modulation(&mut self, _param: (), base: f32, modulation: f32) {
        self.breath = (base + modulation).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_level_scales_block() {
        let mut gain = MasterGain::new(1);
        gain.set(0.5);
        let mut block = vec![1.0f32; 8];
        gain.process(&mut block, 4);
        assert!(block.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn ramp_is_applied_per_frame_on_every_channel() {
        let mut gain = MasterGain::new(1);
        gain.set(0.0);
        gain.ramp_to(1.0, 4);
        let mut block = vec![1.0f32; 8];
        gain.process(&mut block, 4);

        assert_eq!(&block[..4], &[0.0, 0.25, 0.5, 0.75]);
        assert_eq!(&block[4..], &[0.0, 0.25, 0.5, 0.75]);
        assert_eq!(gain.value(), 1.0);
    }

    #[test]
    fn negative_levels_clamp_to_zero() {
        let mut gain = MasterGain::new(0);
        gain.set(-1.0);
        assert_eq!(gain.value(), 0.0);
    }

    #[test]
    fn breath_scales_around_level() {
        let mut gain = MasterGain::new(1);
        gain.set(0.5);
        gain.apply_modulation((), 1.0, 0.2);
        assert!((gain.value() - 0.6).abs() < 1e-6);
        assert_eq!(gain.level(), 0.5);

        let mut block = vec![1.0f32; 4];
        gain.process(&mut block, 4);
        assert!(block.iter().all(|s| (s - 0.6).abs() < 1e-6));

        // Silent master stays silent
        gain.set(0.0);
        assert_eq!(gain.value(), 0.0);
    }

    #[test]
    fn breath_never_inverts_phase() {
        let mut gain = MasterGain::new(1);
        gain.apply_modulation((), 1.0, -3.0);
        assert_eq!(gain.breath(), 0.0);
    }
}
