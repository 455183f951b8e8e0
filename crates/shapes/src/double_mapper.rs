//! Piecewise-linear mapping between two cyclic progress spaces.

use crate::error::{ShapeError, ShapeResult};
use crate::geom::tolerance::DISTANCE_EPSILON;
use crate::utils::{positive_modulo, progress_distance, progress_in_range};

/// Maps outline progress on one shape to outline progress on another,
/// interpolating linearly between a set of matched progress pairs — with
/// wrap-around, since progress lives on the cyclic unit interval.
///
/// Queries are total: inputs are folded into `[0, 1)` before mapping.
#[derive(Clone, Debug)]
pub struct DoubleMapper {
    source_values: Vec<f64>,
    target_values: Vec<f64>,
}

impl DoubleMapper {
    /// Builds a mapper from `(source, target)` progress pairs, in source
    /// order.
    ///
    /// Both sides must be valid progress sequences: all values in
    /// `[0, 1)`, no two consecutive values closer than the distance
    /// tolerance, and wrapping around 1 at most once.
    pub fn new(mappings: &[(f64, f64)]) -> ShapeResult<DoubleMapper> {
        let source_values: Vec<f64> = mappings.iter().map(|m| m.0).collect();
        let target_values: Vec<f64> = mappings.iter().map(|m| m.1).collect();
        validate_progress(&source_values)?;
        validate_progress(&target_values)?;
        Ok(DoubleMapper {
            source_values,
            target_values,
        })
    }

    /// The mapper that leaves progress unchanged.
    pub fn identity() -> DoubleMapper {
        DoubleMapper {
            source_values: vec![0.0, 0.5],
            target_values: vec![0.0, 0.5],
        }
    }

    pub fn map(&self, x: f64) -> f64 {
        linear_map(&self.source_values, &self.target_values, x)
    }

    pub fn map_back(&self, x: f64) -> f64 {
        linear_map(&self.target_values, &self.source_values, x)
    }
}

fn linear_map(x_values: &[f64], y_values: &[f64], x: f64) -> f64 {
    let x = positive_modulo(x, 1.0);
    let n = x_values.len();
    // The cyclic segments between consecutive x values cover the whole
    // interval, so one of them contains x.
    let mut segment_start_index = n - 1;
    for i in 0..n {
        if progress_in_range(x, x_values[i], x_values[(i + 1) % n]) {
            segment_start_index = i;
            break;
        }
    }
    let segment_end_index = (segment_start_index + 1) % n;
    let segment_size_x = positive_modulo(
        x_values[segment_end_index] - x_values[segment_start_index],
        1.0,
    );
    let segment_size_y = positive_modulo(
        y_values[segment_end_index] - y_values[segment_start_index],
        1.0,
    );
    // A vanishing source segment has no usable proportion; land in the
    // middle of the target segment.
    let position_in_segment = if segment_size_x < 0.001 {
        0.5
    } else {
        positive_modulo(x - x_values[segment_start_index], 1.0) / segment_size_x
    };
    positive_modulo(
        y_values[segment_start_index] + segment_size_y * position_in_segment,
        1.0,
    )
}

fn validate_progress(p: &[f64]) -> ShapeResult<()> {
    if p.is_empty() {
        return Err(ShapeError::argument(
            "a progress mapping needs at least one value",
        ));
    }
    let mut prev = p[p.len() - 1];
    let mut wraps = 0;
    for &curr in p {
        if !(0.0..1.0).contains(&curr) {
            return Err(ShapeError::argument(format!(
                "progress must be in [0, 1), got {curr}"
            )));
        }
        if progress_distance(curr, prev) <= DISTANCE_EPSILON {
            return Err(ShapeError::argument(format!(
                "progress values {prev} and {curr} are too close"
            )));
        }
        if curr < prev {
            wraps += 1;
            if wraps > 1 {
                return Err(ShapeError::argument(format!(
                    "progress wraps more than once: {p:?}"
                )));
            }
        }
        prev = curr;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_everything_to_itself() {
        let mapper = DoubleMapper::identity();
        for x in [0.0, 0.1, 0.25, 0.5, 0.75, 0.99] {
            assert!((mapper.map(x) - x).abs() < 1e-12);
            assert!((mapper.map_back(x) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn wrapping_mapping() {
        let mapper = DoubleMapper::new(&[(0.4, 0.2), (0.5, 0.22), (0.0, 0.8)]).unwrap();
        assert!((mapper.map(0.0) - 0.8).abs() < DISTANCE_EPSILON);
        assert!((mapper.map_back(0.8) - 0.0).abs() < DISTANCE_EPSILON);
        assert!((mapper.map(0.4) - 0.2).abs() < DISTANCE_EPSILON);
        assert!((mapper.map(0.5) - 0.22).abs() < DISTANCE_EPSILON);
    }

    #[test]
    fn map_interpolates_within_segments() {
        let mapper = DoubleMapper::new(&[(0.0, 0.0), (0.5, 0.25)]).unwrap();
        // First segment is [0, 0.5] -> [0, 0.25].
        assert!((mapper.map(0.25) - 0.125).abs() < 1e-12);
        // Second (wrapping) segment is [0.5, 1) -> [0.25, 1).
        assert!((mapper.map(0.75) - 0.625).abs() < 1e-12);
    }

    #[test]
    fn map_back_inverts_map() {
        use rand::{Rng, SeedableRng};
        let mapper =
            DoubleMapper::new(&[(0.1, 0.4), (0.3, 0.7), (0.6, 0.9), (0.8, 0.1)]).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let x = rng.gen_range(0.0..1.0);
            let there_and_back = mapper.map_back(mapper.map(x));
            assert!(
                progress_distance(there_and_back, x) < DISTANCE_EPSILON,
                "{x} mapped back to {there_and_back}"
            );
        }
    }

    #[test]
    fn validation_rejects_bad_sequences() {
        // Out of range.
        assert!(DoubleMapper::new(&[(0.0, 0.0), (1.0, 0.5)]).is_err());
        assert!(DoubleMapper::new(&[(-0.1, 0.0), (0.5, 0.5)]).is_err());
        // Too close together (cyclically).
        assert!(DoubleMapper::new(&[(0.0, 0.0), (0.0, 0.5)]).is_err());
        assert!(DoubleMapper::new(&[(0.0, 0.5), (0.5, 0.500001)]).is_err());
        // Wrapping twice.
        assert!(DoubleMapper::new(&[(0.3, 0.0), (0.1, 0.3), (0.4, 0.6), (0.2, 0.9)]).is_err());
        // A single pair cannot validate against itself.
        assert!(DoubleMapper::new(&[(0.3, 0.3)]).is_err());
        assert!(DoubleMapper::new(&[]).is_err());
    }

    #[test]
    fn total_on_out_of_range_input() {
        let mapper = DoubleMapper::identity();
        // Inputs are folded into [0, 1).
        assert!((mapper.map(1.0) - 0.0).abs() < 1e-12);
        assert!((mapper.map(1.25) - 0.25).abs() < 1e-12);
        assert!((mapper.map(-0.25) - 0.75).abs() < 1e-12);
    }
}
