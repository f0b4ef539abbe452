//! Parameter modulation primitives.

/*
Parameter Modulation
====================

Ambient textures live on slow movement: a chant that swells and recedes
like breath, wind whose band-pass cutoff drifts as if gusting, surf whose
level rises and falls every ten seconds. All of these are one control signal
(an LFO) continuously varying one parameter of another layer.

Vocabulary
----------

  modulator     The control signal, an LFO swinging in [-1.0, +1.0].

  target        The parameter being moved: a layer gain or a filter cutoff.

  depth         How far the parameter moves, in the parameter's own units
                (linear gain, or Hz for a cutoff).

  base value    The parameter's value when the modulator is 0.


The Math
--------

Modulation is ADDITIVE:

    modulated_value = base_value + (modulator × depth)

Example: wind band-pass with a gust LFO
    base_value = 500 Hz, depth = 300 Hz
    LFO = -1.0  →  200 Hz   (low rumble)
    LFO =  0.0  →  500 Hz
    LFO = +1.0  →  800 Hz   (whistling gust)

Example: breathing chant
    base gain = 0.25, depth = 0.08
    the fundamental swells between 0.17 and 0.33


Block-Rate Modulation
---------------------

The parameter is updated once per render block from the AVERAGE of the LFO
samples in that block. Ambient LFOs run well below 1 Hz, so even a 2048
sample block (~43 ms at 48 kHz) is a tiny slice of one cycle and the steps
are inaudible. Filter coefficients are recomputed once per block instead of
once per sample.


Clamping
--------

Additive modulation can push a parameter out of range (a negative gain, a
cutoff above Nyquist). The target clamps: gains to >= 0, cutoffs to
[20 Hz, 0.49 × sample rate]. Presets pick base and depth so the sweep stays
inside the valid range and the clamp is never audible.
*/

/// Calculate the modulated parameter value: base + (modulator × depth).
#[inline]
pub fn apply_modulation(base_value: f32, modulator: f32, depth: f32) -> f32 {
    base_value + (modulator * depth)
}

/// Calculate the average of a modulator signal over a block.
///
/// Used for block-rate modulation: we need one value to represent
/// the entire block's worth of modulator samples.
#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}
