//! Arc-length measurement over a shape's outline.
//!
//! Morphing needs both shapes parameterized by the same quantity. A
//! [`Measurer`] maps each curve to a scalar size; a [`MeasuredPolygon`]
//! turns those sizes into a monotonic outline progress in `[0, 1]` and
//! remembers where the corner features sit on it.

use crate::error::{ShapeError, ShapeResult};
use crate::feature::Feature;
use crate::geom::tolerance::DISTANCE_EPSILON;
use crate::geom::Cubic;
use crate::rounded_polygon::RoundedPolygon;
use crate::utils::positive_modulo;

/// Maps a curve to a scalar size and finds split points by partial size.
pub trait Measurer {
    /// The size of `cubic` under this measure. Must not be negative, and
    /// must be additive under splitting (approximately), or outline
    /// progress stops meaning anything.
    fn measure_cubic(&self, cubic: &Cubic) -> f64;

    /// The parameter `t` at which the first `m` units of the curve's size
    /// are consumed, clamped to `[0, 1]` when `m` is out of range.
    fn find_cut_parameter(&self, cubic: &Cubic, m: f64) -> f64;
}

/// Approximates each curve's arc length by a fixed three-segment polyline.
///
/// Three segments keep the worst case the corner builder produces (a
/// quarter-circle arc) above 98.5% accuracy, which is plenty for
/// parameterizing a morph, and stay cheap enough to re-run on every split.
#[derive(Copy, Clone, Debug, Default)]
pub struct LengthMeasurer;

const SEGMENTS: usize = 3;

impl LengthMeasurer {
    /// Walks the polyline accumulating length; returns the progress at
    /// which `threshold` is reached and the length walked until then.
    fn closest_progress_to(&self, cubic: &Cubic, threshold: f64) -> (f64, f64) {
        let mut total = 0.0;
        let mut remainder = threshold;
        let mut prev = cubic.from;
        for i in 1..=SEGMENTS {
            let progress = i as f64 / SEGMENTS as f64;
            let p = cubic.sample(progress);
            let segment = (p - prev).length();
            if segment >= remainder {
                return (
                    progress - (1.0 - remainder / segment) / SEGMENTS as f64,
                    threshold,
                );
            }
            remainder -= segment;
            total += segment;
            prev = p;
        }
        (1.0, total)
    }
}

impl Measurer for LengthMeasurer {
    fn measure_cubic(&self, cubic: &Cubic) -> f64 {
        self.closest_progress_to(cubic, f64::INFINITY).1
    }

    fn find_cut_parameter(&self, cubic: &Cubic, m: f64) -> f64 {
        self.closest_progress_to(cubic, m).0
    }
}

/// A curve together with the outline progress range it spans and its
/// cached measured size.
#[derive(Clone, Debug)]
pub struct MeasuredCubic {
    cubic: Cubic,
    start_outline_progress: f64,
    end_outline_progress: f64,
    measured_size: f64,
}

impl MeasuredCubic {
    fn new(
        cubic: Cubic,
        start_outline_progress: f64,
        end_outline_progress: f64,
        measured_size: f64,
    ) -> ShapeResult<Self> {
        if end_outline_progress < start_outline_progress {
            return Err(ShapeError::state(
                "measured curve progress range must not be reversed",
            ));
        }
        Ok(MeasuredCubic {
            cubic,
            start_outline_progress,
            end_outline_progress,
            measured_size,
        })
    }

    #[inline]
    pub fn cubic(&self) -> &Cubic {
        &self.cubic
    }

    #[inline]
    pub fn start_outline_progress(&self) -> f64 {
        self.start_outline_progress
    }

    #[inline]
    pub fn end_outline_progress(&self) -> f64 {
        self.end_outline_progress
    }

    #[inline]
    pub fn measured_size(&self) -> f64 {
        self.measured_size
    }
}

/// A corner feature pinned to its position on the outline: `progress` is
/// the arc-progress at the middle of the feature's curves.
#[derive(Clone, Debug)]
pub struct ProgressableFeature {
    pub progress: f64,
    pub feature: Feature,
}

/// A polygon outline parameterized by a [`Measurer`].
///
/// The measured curves partition `[0, 1]`: the first starts at 0, each
/// one starts where the previous ended, the last ends at 1, and every span
/// is longer than the distance tolerance.
#[derive(Clone)]
pub struct MeasuredPolygon<M: Measurer> {
    measurer: M,
    cubics: Vec<MeasuredCubic>,
    features: Vec<ProgressableFeature>,
}

impl<M: Measurer> MeasuredPolygon<M> {
    /// Measures `polygon`'s outline, recording one progress entry per
    /// corner feature (at the middle of the corner).
    pub fn measure(measurer: M, polygon: &RoundedPolygon) -> ShapeResult<Self> {
        let mut cubics = Vec::new();
        let mut feature_to_cubic: Vec<(&Feature, usize)> = Vec::new();
        for feature in polygon.features() {
            let feature_cubics = feature.cubics();
            for (index, cubic) in feature_cubics.iter().enumerate() {
                if feature.is_corner() && index == feature_cubics.len() / 2 {
                    feature_to_cubic.push((feature, cubics.len()));
                }
                cubics.push(*cubic);
            }
        }

        let mut measures = Vec::with_capacity(cubics.len() + 1);
        measures.push(0.0);
        let mut total = 0.0;
        for cubic in &cubics {
            let size = measurer.measure_cubic(cubic);
            if size < 0.0 {
                return Err(ShapeError::state("measured curve size must not be negative"));
            }
            total += size;
            measures.push(total);
        }
        if total < DISTANCE_EPSILON {
            return Err(ShapeError::argument(
                "the outline is too short to measure",
            ));
        }

        let outline_progress: Vec<f64> = measures.iter().map(|m| m / total).collect();
        let features = feature_to_cubic
            .into_iter()
            .map(|(feature, ix)| ProgressableFeature {
                progress: positive_modulo(
                    (outline_progress[ix] + outline_progress[ix + 1]) / 2.0,
                    1.0,
                ),
                feature: feature.clone(),
            })
            .collect();
        Self::from_parts(measurer, cubics, outline_progress, features)
    }

    /// Builds the measured curve list from raw curves and their outline
    /// progress boundaries, skipping spans too thin to matter and forcing
    /// the last kept span to end exactly at 1.
    fn from_parts(
        measurer: M,
        cubics: Vec<Cubic>,
        outline_progress: Vec<f64>,
        features: Vec<ProgressableFeature>,
    ) -> ShapeResult<Self> {
        debug_assert_eq!(outline_progress.len(), cubics.len() + 1);
        let mut measured = Vec::with_capacity(cubics.len());
        let mut start_outline_progress = 0.0;
        for (index, cubic) in cubics.into_iter().enumerate() {
            if outline_progress[index + 1] - start_outline_progress > DISTANCE_EPSILON {
                let size = measurer.measure_cubic(&cubic);
                measured.push(MeasuredCubic::new(
                    cubic,
                    start_outline_progress,
                    outline_progress[index + 1],
                    size,
                )?);
                start_outline_progress = outline_progress[index + 1];
            }
        }
        let last = measured
            .last_mut()
            .ok_or_else(|| ShapeError::state("no measurable curves in the outline"))?;
        last.end_outline_progress = 1.0;
        Ok(MeasuredPolygon {
            measurer,
            cubics: measured,
            features,
        })
    }

    /// The corner features with their outline progress.
    #[inline]
    pub fn features(&self) -> &[ProgressableFeature] {
        &self.features
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cubics.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cubics.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&MeasuredCubic> {
        self.cubics.get(index)
    }

    /// Splits `measured_cubic` at the given outline progress, re-measuring
    /// both halves. The requested progress is clamped into the curve's
    /// range; error further up the pipeline can put it epsilon outside.
    pub(crate) fn cut_at_progress(
        &self,
        measured_cubic: &MeasuredCubic,
        cut_outline_progress: f64,
    ) -> ShapeResult<(MeasuredCubic, MeasuredCubic)> {
        let bounded = cut_outline_progress.clamp(
            measured_cubic.start_outline_progress,
            measured_cubic.end_outline_progress,
        );
        let outline_progress_size =
            measured_cubic.end_outline_progress - measured_cubic.start_outline_progress;
        let progress_from_start = bounded - measured_cubic.start_outline_progress;
        let relative_progress = progress_from_start / outline_progress_size;
        let t = self.measurer.find_cut_parameter(
            &measured_cubic.cubic,
            relative_progress * measured_cubic.measured_size,
        );
        if !(0.0..=1.0).contains(&t) {
            return Err(ShapeError::state("cut parameter must be within the curve"));
        }
        let (c1, c2) = measured_cubic.cubic.split(t);
        Ok((
            MeasuredCubic::new(
                c1,
                measured_cubic.start_outline_progress,
                bounded,
                self.measurer.measure_cubic(&c1),
            )?,
            MeasuredCubic::new(
                c2,
                bounded,
                measured_cubic.end_outline_progress,
                self.measurer.measure_cubic(&c2),
            )?,
        ))
    }

    /// An equivalent measured outline whose progress origin is at
    /// `cutting_point` of this one.
    ///
    /// The curve containing the cutting point is split there; its second
    /// half becomes the new first curve and its first half the new last
    /// one, and every progress value shifts by `-cutting_point` (mod 1).
    pub fn cut_and_shift(&self, cutting_point: f64) -> ShapeResult<Self>
    where
        M: Clone,
    {
        if !(0.0..=1.0).contains(&cutting_point) {
            return Err(ShapeError::argument(format!(
                "the cutting point must be within [0, 1], got {cutting_point}"
            )));
        }
        if cutting_point < DISTANCE_EPSILON {
            return Ok(self.clone());
        }
        let n = self.cubics.len();
        let target_index = self
            .cubics
            .iter()
            .position(|c| {
                (c.start_outline_progress..=c.end_outline_progress).contains(&cutting_point)
            })
            .ok_or_else(|| ShapeError::state("the cutting point is not on the outline"))?;
        let target = &self.cubics[target_index];
        let (b1, b2) = self.cut_at_progress(target, cutting_point)?;

        let mut ret_cubics = Vec::with_capacity(n + 1);
        ret_cubics.push(b2.cubic);
        for i in 1..n {
            ret_cubics.push(self.cubics[(i + target_index) % n].cubic);
        }
        ret_cubics.push(b1.cubic);

        let mut ret_outline_progress = Vec::with_capacity(n + 2);
        for index in 0..n + 2 {
            ret_outline_progress.push(if index == 0 {
                0.0
            } else if index == n + 1 {
                1.0
            } else {
                positive_modulo(
                    self.cubics[(target_index + index - 1) % n].end_outline_progress
                        - cutting_point,
                    1.0,
                )
            });
        }

        let features = self
            .features
            .iter()
            .map(|f| ProgressableFeature {
                progress: positive_modulo(f.progress - cutting_point, 1.0),
                feature: f.feature.clone(),
            })
            .collect();

        Self::from_parts(
            self.measurer.clone(),
            ret_cubics,
            ret_outline_progress,
            features,
        )
    }
}

impl<M: Measurer> core::ops::Index<usize> for MeasuredPolygon<M> {
    type Output = MeasuredCubic;
    fn index(&self, index: usize) -> &MeasuredCubic {
        &self.cubics[index]
    }
}
