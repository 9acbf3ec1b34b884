//! Feature-path bookkeeping for TreeSHAP.
//!
//! A [`PathState`] tracks the unique features on the current root-to-node
//! path together with the proportion of subsets flowing down it. `extend`
//! and `unwind` maintain the permutation weights incrementally so each leaf
//! can be attributed in O(depth²) instead of enumerating subsets.

/// Path of unique features with subset-weight bookkeeping (SoA layout).
///
/// Element 0 is a sentinel with feature index -1 inserted by the initial
/// extend at the root; real features occupy positions 1..len.
#[derive(Debug, Clone, Default)]
pub struct PathState {
    features: Vec<i32>,
    zero_fractions: Vec<f64>,
    one_fractions: Vec<f64>,
    weights: Vec<f64>,
}

impl PathState {
    /// Empty path, ready for the root extend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty path with room for `capacity` elements. [`extended`] carries
    /// the capacity into child paths, so one allocation per array covers a
    /// whole root-to-leaf walk.
    ///
    /// [`extended`]: PathState::extended
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            features: Vec::with_capacity(capacity),
            zero_fractions: Vec::with_capacity(capacity),
            one_fractions: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements on the path (sentinel included).
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[inline]
    pub fn feature(&self, i: usize) -> i32 {
        self.features[i]
    }

    #[inline]
    pub fn zero_fraction(&self, i: usize) -> f64 {
        self.zero_fractions[i]
    }

    #[inline]
    pub fn one_fraction(&self, i: usize) -> f64 {
        self.one_fractions[i]
    }

    /// Position of `feature` on the path, if present.
    pub fn find_feature(&self, feature: i32) -> Option<usize> {
        self.features.iter().position(|&f| f == feature)
    }

    /// Copy the path and append a feature with the given flow fractions.
    ///
    /// `zero_fraction` is the proportion of feature-absent subsets flowing
    /// down this branch; `one_fraction` is 1 when the explained sample takes
    /// the branch and 0 otherwise. The copy keeps the source's capacity.
    pub fn extended(&self, zero_fraction: f64, one_fraction: f64, feature: i32) -> Self {
        let mut next = Self::with_capacity(self.features.capacity().max(self.len() + 1));
        next.features.extend_from_slice(&self.features);
        next.zero_fractions.extend_from_slice(&self.zero_fractions);
        next.one_fractions.extend_from_slice(&self.one_fractions);
        next.weights.extend_from_slice(&self.weights);
        next.extend(zero_fraction, one_fraction, feature);
        next
    }

    fn extend(&mut self, zero_fraction: f64, one_fraction: f64, feature: i32) {
        let d = self.len();
        self.features.push(feature);
        self.zero_fractions.push(zero_fraction);
        self.one_fractions.push(one_fraction);
        self.weights.push(if d == 0 { 1.0 } else { 0.0 });

        let scale = (d + 1) as f64;
        for i in (0..d).rev() {
            self.weights[i + 1] += one_fraction * self.weights[i] * (i + 1) as f64 / scale;
            self.weights[i] = zero_fraction * self.weights[i] * (d - i) as f64 / scale;
        }
    }

    /// Remove the element at `index`, restoring the weights to the state
    /// they would have had if that feature had never been extended.
    pub fn unwind(&mut self, index: usize) {
        let d = self.len() - 1;
        let one_fraction = self.one_fractions[index];
        let zero_fraction = self.zero_fractions[index];
        let scale = (d + 1) as f64;

        let mut next_one_portion = self.weights[d];
        for j in (0..d).rev() {
            if one_fraction != 0.0 {
                let tmp = self.weights[j];
                self.weights[j] = next_one_portion * scale / ((j + 1) as f64 * one_fraction);
                next_one_portion = tmp - self.weights[j] * zero_fraction * (d - j) as f64 / scale;
            } else {
                self.weights[j] = self.weights[j] * scale / (zero_fraction * (d - j) as f64);
            }
        }

        // Weights stay positional; only the feature columns shift down.
        self.features.remove(index);
        self.zero_fractions.remove(index);
        self.one_fractions.remove(index);
        self.weights.truncate(d);
    }

    /// Total permutation weight of the path with element `index` unwound,
    /// without mutating the path. This is the `w` factor of the element's
    /// contribution at a leaf.
    pub fn unwound_sum(&self, index: usize) -> f64 {
        let d = self.len() - 1;
        let one_fraction = self.one_fractions[index];
        let zero_fraction = self.zero_fractions[index];
        let scale = (d + 1) as f64;

        let mut total = 0.0;
        if one_fraction != 0.0 {
            let mut next_one_portion = self.weights[d];
            for j in (0..d).rev() {
                let tmp = next_one_portion * scale / ((j + 1) as f64 * one_fraction);
                total += tmp;
                next_one_portion = self.weights[j] - tmp * zero_fraction * (d - j) as f64 / scale;
            }
        } else {
            for j in (0..d).rev() {
                total += self.weights[j] * scale / (zero_fraction * (d - j) as f64);
            }
        }
        total
    }
}
