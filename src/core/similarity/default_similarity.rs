use crate::config::SimilarityConfig;
use crate::core::similarity::{FieldInvertState, Similarity};

/// Classic tf-idf scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DefaultSimilarity {
    discount_overlaps: bool,
}

impl DefaultSimilarity {
    pub fn new(discount_overlaps: bool) -> Self {
        Self { discount_overlaps }
    }

    pub fn discount_overlaps(&self) -> bool {
        self.discount_overlaps
    }
}

impl From<SimilarityConfig> for DefaultSimilarity {
    fn from(config: SimilarityConfig) -> Self {
        Self::new(config.discount_overlaps)
    }
}

impl Similarity for DefaultSimilarity {
    fn length_norm(&self, _field: &str, num_terms: u32) -> f32 {
        (1.0 / (num_terms as f64).sqrt()) as f32
    }

    fn compute_norm(&self, field: &str, state: &FieldInvertState) -> f32 {
        let num_terms = match self.discount_overlaps {
            true => state.length.saturating_sub(state.num_overlap),
            false => state.length,
        };
        state.boost * self.length_norm(field, num_terms)
    }

    fn query_norm(&self, sum_of_squared_weights: f32) -> f32 {
        (1.0 / (sum_of_squared_weights as f64).sqrt()) as f32
    }

    fn tf(&self, freq: f32) -> f32 {
        freq.sqrt()
    }

    fn sloppy_freq(&self, distance: u32) -> f32 {
        1.0 / (distance as f32 + 1.0)
    }

    fn idf(&self, doc_freq: u32, num_docs: u32) -> f32 {
        ((num_docs as f64 / (doc_freq as f64 + 1.0)).ln() + 1.0) as f32
    }

    fn coord(&self, overlap: usize, max_overlap: usize) -> f32 {
        overlap as f32 / max_overlap as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_default_formulas() {
        let sim = DefaultSimilarity::default();
        assert!(approx(sim.idf(0, 100), 100f32.ln() + 1.0));
        assert!(approx(sim.idf(99, 100), 1.0));
        assert!(approx(sim.length_norm("body", 4), 0.5));
        assert!(approx(sim.coord(2, 4), 0.5));
        assert!(approx(sim.tf(9.0), 3.0));
        assert!(approx(sim.query_norm(4.0), 0.5));
        assert!(approx(sim.sloppy_freq(0), 1.0));
        assert!(approx(sim.sloppy_freq(3), 0.25));
        // empty field: infinite length norm, the caller decides what to do with it
        assert!(sim.length_norm("body", 0).is_infinite());
    }

    #[test]
    fn test_compute_norm_discount_overlaps() {
        let state = FieldInvertState { length: 8, num_overlap: 4, position: 3, boost: 2.0 };
        assert!(approx(DefaultSimilarity::new(false).compute_norm("body", &state), 2.0 / 8f32.sqrt()));
        assert!(approx(DefaultSimilarity::new(true).compute_norm("body", &state), 1.0));

        let sim: DefaultSimilarity = SimilarityConfig { discount_overlaps: true }.into();
        assert!(sim.discount_overlaps());
    }
}
