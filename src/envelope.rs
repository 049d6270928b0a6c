//! Worst-case placement of a lane load pattern on an influence line.
//!
//! A pattern is positioned in two regimes: partial loading, where the pattern
//! enters the bridge from one end and covers only a prefix of it, and full
//! loading, where one sequence completely contains the other at every valid
//! offset. Both regimes run on the influence line and on its mirror image;
//! on the mirror image the entering prefix of the lane is reversed.
//! Positive and negative ordinates are evaluated separately so that a lane
//! load can be applied only over the stretches that increase the response.

use ndarray::{s, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::sweep::SAMPLE_SPACING;

/// Longest lane a pattern can describe. Offsets beyond it are clamped.
pub const MAX_LANE_LENGTH: f64 = 10_000.0;

/// Lane load discretised at the influence-line sample spacing.
///
/// Each sample holds the load that acts on one `SAMPLE_SPACING` strip, so a
/// uniform intensity `q` contributes `q * SAMPLE_SPACING` per sample and a
/// concentrated axle contributes its whole weight to a single sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadPattern {
    /// Load per sample, front of the lane first.
    samples: Vec<f64>,
}

impl LoadPattern {
    /// Wrap pre-discretised samples.
    #[must_use]
    pub fn from_samples(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// Uniform load of `intensity` over `length`.
    ///
    /// # Examples
    /// ```
    /// use trussline::LoadPattern;
    ///
    /// let lane = LoadPattern::uniform(10.0, 1.0);
    /// assert_eq!(lane.len(), 10);
    /// assert!((lane.samples()[0] - 1.0).abs() < 1.0e-12);
    /// ```
    #[must_use]
    pub fn uniform(intensity: f64, length: f64) -> Self {
        Self::default().with_uniform(0.0, length, intensity)
    }

    /// Add a uniform load of `intensity` between `start` and `end`.
    #[must_use]
    pub fn with_uniform(mut self, start: f64, end: f64, intensity: f64) -> Self {
        let first = sample_index(start);
        let last = sample_index(end);
        if last > first {
            self.extend_to(last);
            for sample in &mut self.samples[first..last] {
                *sample += intensity * SAMPLE_SPACING;
            }
        }
        self
    }

    /// Add a concentrated load of `force` at `offset` from the front of the lane.
    #[must_use]
    pub fn with_axle(mut self, offset: f64, force: f64) -> Self {
        let index = sample_index(offset);
        self.extend_to(index + 1);
        self.samples[index] += force;
        self
    }

    /// Load per sample.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the pattern carries no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Grow the pattern with unloaded samples up to `len`.
    fn extend_to(&mut self, len: usize) {
        if self.samples.len() < len {
            self.samples.resize(len, 0.0);
        }
    }
}

/// Index of the sample that contains `distance`, clamped to the longest lane.
fn sample_index(distance: f64) -> usize {
    (distance.max(0.0).min(MAX_LANE_LENGTH) / SAMPLE_SPACING).round() as usize
}

/// Extreme member forces over every admissible placement of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Largest tensile (positive) force.
    pub max_positive: f64,
    /// Largest compressive (negative) force.
    pub min_negative: f64,
}

impl Envelope {
    /// Envelope that any placement will widen.
    fn unbounded() -> Self {
        Self {
            max_positive: f64::NEG_INFINITY,
            min_negative: f64::INFINITY,
        }
    }

    /// Widen the envelope with one placement.
    fn update(&mut self, positive: f64, negative: f64) {
        self.max_positive = self.max_positive.max(positive);
        self.min_negative = self.min_negative.min(negative);
    }
}

/// Find the worst positive and negative response of `line` under `pattern`.
///
/// # Examples
/// ```
/// use trussline::{envelope, LoadPattern};
///
/// let line = [0.0, 1.0, -1.0, 0.0];
/// let result = envelope::search(&line, &LoadPattern::from_samples(vec![2.0]));
/// assert_eq!(result.max_positive, 2.0);
/// assert_eq!(result.min_negative, -2.0);
/// ```
#[must_use]
pub fn search(line: &[f64], pattern: &LoadPattern) -> Envelope {
    let mirrored: Vec<f64> = line.iter().rev().copied().collect();
    let mut envelope = Envelope::unbounded();
    place(line, pattern, Entry::Front, &mut envelope);
    place(&mirrored, pattern, Entry::Back, &mut envelope);
    envelope
}

/// Which end of the lane leads when it enters the loaded line from its start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entry {
    /// The front of the lane sits at the start of the line.
    Front,
    /// The lane prefix is reversed, so its front sits deepest in the span.
    Back,
}

/// Run both regimes on one orientation of the line.
fn place(data: &[f64], pattern: &LoadPattern, entry: Entry, envelope: &mut Envelope) {
    let load = ArrayView1::from(pattern.samples());
    let data = ArrayView1::from(data);
    let positive = data.mapv(|x| if x > 0.0 { x } else { 0.0 });
    let negative = data.mapv(|x| if x < 0.0 { x } else { 0.0 });
    partial_loading(positive.view(), negative.view(), load, entry, envelope);
    full_loading(positive.view(), negative.view(), load, envelope);
}

/// Lane prefixes of every length entering from the start of the line, the rest unloaded.
///
/// For a prefix of `i` samples, line sample `k` carries `load[k]` with
/// [`Entry::Front`] and `load[i - 1 - k]` with [`Entry::Back`].
fn partial_loading(
    positive: ArrayView1<f64>,
    negative: ArrayView1<f64>,
    load: ArrayView1<f64>,
    entry: Entry,
    envelope: &mut Envelope,
) {
    envelope.update(0.0, 0.0);
    let reach = positive.len().min(load.len());
    match entry {
        Entry::Front => {
            let (mut pos_sum, mut neg_sum) = (0.0, 0.0);
            for k in 0..reach {
                pos_sum += positive[k] * load[k];
                neg_sum += negative[k] * load[k];
                envelope.update(pos_sum, neg_sum);
            }
        }
        Entry::Back => {
            for i in 1..=reach {
                let lane = load.slice(s![..i;-1]);
                envelope.update(
                    positive.slice(s![..i]).dot(&lane),
                    negative.slice(s![..i]).dot(&lane),
                );
            }
        }
    }
}

/// Every offset at which the shorter of line and lane lies entirely within the longer.
fn full_loading(
    positive: ArrayView1<f64>,
    negative: ArrayView1<f64>,
    load: ArrayView1<f64>,
    envelope: &mut Envelope,
) {
    let n = positive.len();
    let m = load.len();
    if m >= n {
        for offset in 0..=(m - n) {
            let window = load.slice(s![offset..offset + n]);
            envelope.update(positive.dot(&window), negative.dot(&window));
        }
    } else {
        for offset in 0..=(n - m) {
            envelope.update(
                positive.slice(s![offset..offset + m]).dot(&load),
                negative.slice(s![offset..offset + m]).dot(&load),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn uniform_pattern_spreads_intensity() {
        let lane = LoadPattern::uniform(92.0, 30.0);
        assert_eq!(lane.len(), 300);
        assert_relative_eq!(lane.samples().iter().sum::<f64>(), 92.0 * 30.0, epsilon = 1.0e-9);
    }

    #[test]
    fn axles_extend_pattern() {
        let lane = LoadPattern::default().with_axle(0.0, 220.0).with_axle(1.5, 220.0);
        assert_eq!(lane.len(), 16);
        assert_relative_eq!(lane.samples()[15], 220.0);
        assert_relative_eq!(lane.samples()[0], 220.0);
        assert_relative_eq!(lane.samples()[1..15].iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn single_axle_finds_peak_ordinates() {
        let line = [0.0, 0.25, 0.5, -0.75, 0.1];
        let result = search(&line, &LoadPattern::from_samples(vec![4.0]));
        assert_relative_eq!(result.max_positive, 2.0);
        assert_relative_eq!(result.min_negative, -3.0);
    }

    #[test]
    fn uniform_load_covers_only_same_sign_region() {
        // The positive part sums to 3 whatever the placement; unit load per sample.
        let line = [1.0, 1.0, -2.0, 1.0];
        let lane = LoadPattern::from_samples(vec![1.0; 4]);
        let result = search(&line, &lane);
        assert_relative_eq!(result.max_positive, 3.0);
        assert_relative_eq!(result.min_negative, -2.0);
    }

    #[test]
    fn long_lane_slides_across_line() {
        let line = [0.0, 1.0, 0.0];
        let lane = LoadPattern::from_samples(vec![1.0, 5.0, 2.0, 0.0, 0.0]);
        let result = search(&line, &lane);
        assert_relative_eq!(result.max_positive, 5.0);
        assert_relative_eq!(result.min_negative, 0.0);
    }

    #[test]
    fn empty_pattern_gives_zero_envelope() {
        let result = search(&[1.0, -1.0], &LoadPattern::default());
        assert_eq!(result, Envelope { max_positive: 0.0, min_negative: 0.0 });
    }

    #[test]
    fn far_offsets_are_clamped_to_the_longest_lane() {
        let longest = sample_index(MAX_LANE_LENGTH) + 1;
        let pattern = LoadPattern::default()
            .with_axle(1.0e300, 5.0)
            .with_axle(f64::INFINITY, 5.0)
            .with_uniform(0.0, f64::MAX, 1.0);
        assert_eq!(pattern.len(), longest);
        assert_relative_eq!(pattern.samples()[longest - 1], 10.0, epsilon = 1.0e-12);
        assert_eq!(LoadPattern::default().with_axle(f64::NAN, 1.0).len(), 1);
    }

    /// Direct evaluation of every placement, sample by sample.
    fn brute_force(line: &[f64], load: &[f64]) -> (f64, f64) {
        let n = line.len();
        let (mut hi, mut lo) = (f64::NEG_INFINITY, f64::INFINITY);
        for mirrored in [false, true] {
            let data: Vec<f64> = if mirrored {
                line.iter().rev().copied().collect()
            } else {
                line.to_vec()
            };
            let mut evaluate = |placed: &[f64]| {
                let pos: f64 = data.iter().zip(placed).map(|(d, l)| d.max(0.0) * l).sum();
                let neg: f64 = data.iter().zip(placed).map(|(d, l)| d.min(0.0) * l).sum();
                hi = hi.max(pos);
                lo = lo.min(neg);
            };
            for i in 0..=n.min(load.len()) {
                let mut placed = vec![0.0; n];
                for k in 0..i {
                    placed[k] = if mirrored { load[i - 1 - k] } else { load[k] };
                }
                evaluate(&placed);
            }
            if load.len() >= n {
                for offset in 0..=load.len() - n {
                    evaluate(&load[offset..offset + n]);
                }
            } else {
                for offset in 0..=n - load.len() {
                    let mut placed = vec![0.0; n];
                    placed[offset..offset + load.len()].copy_from_slice(load);
                    evaluate(&placed);
                }
            }
        }
        (hi, lo)
    }

    fn sample_line() -> Vec<f64> {
        (0..641)
            .map(|k| (k as f64 * 0.013).sin() * (1.0 - k as f64 / 641.0))
            .collect()
    }

    #[test]
    fn matches_direct_evaluation_with_leading_axles() {
        let line = sample_line();
        for lane in [
            LoadPattern::uniform(10.0, 99.3).with_axle(0.0, 300.0).with_axle(1.5, 300.0),
            LoadPattern::uniform(10.0, 20.0).with_axle(0.0, 300.0).with_axle(1.5, 300.0),
        ] {
            let result = search(&line, &lane);
            let (hi, lo) = brute_force(&line, lane.samples());
            assert_relative_eq!(result.max_positive, hi, max_relative = 1.0e-9);
            assert_relative_eq!(result.min_negative, lo, max_relative = 1.0e-9);
        }
    }

    #[test]
    fn leading_axles_reach_into_the_span_from_the_far_end() {
        // Only the last ordinate is loaded; the mirrored pass must bring the
        // heavy front axle onto it.
        let line = [0.0, 0.0, 0.0, 1.0];
        let lane = LoadPattern::from_samples(vec![100.0, 1.0, 1.0, 1.0]);
        assert_relative_eq!(search(&line, &lane).max_positive, 100.0);
        let line = [0.0, 0.0, 1.0, 0.0];
        assert_relative_eq!(search(&line, &lane).max_positive, 100.0);
    }

    #[test]
    fn reversed_line_with_swapped_orientations_gives_same_envelope() {
        let line = sample_line();
        let reversed: Vec<f64> = line.iter().rev().copied().collect();
        let lane = LoadPattern::uniform(92.0, 70.0)
            .with_axle(0.0, 220.0)
            .with_axle(1.5, 220.0)
            .with_axle(3.0, 220.0);
        let mut swapped = Envelope::unbounded();
        place(&reversed, &lane, Entry::Back, &mut swapped);
        place(&line, &lane, Entry::Front, &mut swapped);
        let forward = search(&line, &lane);
        assert_relative_eq!(forward.max_positive, swapped.max_positive, max_relative = 1.0e-12);
        assert_relative_eq!(forward.min_negative, swapped.min_negative, max_relative = 1.0e-12);
    }

    #[test]
    fn uniform_lane_is_indifferent_to_direction() {
        let line = sample_line();
        let reversed: Vec<f64> = line.iter().rev().copied().collect();
        let lane = LoadPattern::uniform(92.0, 70.0);
        let forward = search(&line, &lane);
        let backward = search(&reversed, &lane);
        assert_relative_eq!(forward.max_positive, backward.max_positive, max_relative = 1.0e-9);
        assert_relative_eq!(forward.min_negative, backward.min_negative, max_relative = 1.0e-9);
    }
}
