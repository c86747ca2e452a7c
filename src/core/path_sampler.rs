use bevy_math::cubic_splines::{CubicCardinalSpline, CubicCurve, CyclicCubicGenerator};
use bevy_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::route::{Route, RouteError};

/// Arc-length table resolution, per spline segment.
const ARC_SAMPLES_PER_SEGMENT: usize = 24;

/// Below this total length the route is treated as a single point.
const MIN_ROUTE_LENGTH: f32 = 1e-6;

/// Reduces any real parameter into `[0, 1)`. Non-finite input maps to 0.
pub fn wrap_parameter(parameter: f32) -> f32 {
    if !parameter.is_finite() {
        return 0.0;
    }
    let wrapped = parameter.rem_euclid(1.0);
    // rem_euclid rounds tiny negatives up to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// How a normalized parameter maps onto the spline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parameterization {
    /// Every segment takes the same share of the loop, regardless of its length.
    Uniform,
    /// Parameter is the fraction of total arc length travelled, so equal
    /// parameter steps cover equal distances.
    #[default]
    ArcLength,
}

/// Samples a closed Catmull-Rom spline fitted through a [`Route`].
#[derive(Debug, Clone)]
pub struct PathSampler {
    route: Route,
    curve: CubicCurve<Vec2>,
    parameterization: Parameterization,
    // cumulative length at evenly spaced raw parameters, first entry 0
    arc_lengths: Vec<f32>,
}

impl PathSampler {
    pub fn new(route: Route, parameterization: Parameterization) -> Result<Self, RouteError> {
        let curve = CubicCardinalSpline::new_catmull_rom(route.points().iter().copied().collect::<Vec<_>>())
            .to_curve_cyclic()?;

        let mut sampler = PathSampler {
            route,
            curve,
            parameterization,
            arc_lengths: Vec::new(),
        };
        sampler.arc_lengths = sampler.build_arc_table();
        Ok(sampler)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn parameterization(&self) -> Parameterization {
        self.parameterization
    }

    /// Total length of the closed loop.
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point on the loop at `parameter`, which is first wrapped into `[0, 1)`.
    pub fn position_at(&self, parameter: f32) -> Vec2 {
        let raw = self.raw_parameter(wrap_parameter(parameter));
        self.sample_raw(raw)
    }

    /// Parameter at which control point `index` is reproduced exactly.
    pub fn knot_parameter(&self, index: usize) -> f32 {
        let index = index % self.route.len();
        match self.parameterization {
            Parameterization::Uniform => index as f32 / self.route.len() as f32,
            Parameterization::ArcLength if self.is_degenerate() => {
                index as f32 / self.route.len() as f32
            }
            Parameterization::ArcLength => {
                self.arc_lengths[index * ARC_SAMPLES_PER_SEGMENT] / self.length()
            }
        }
    }

    /// `divisions + 1` evenly spaced points; the last one closes the loop.
    pub fn polyline(&self, divisions: usize) -> Vec<Vec2> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.position_at(i as f32 / divisions as f32))
            .collect()
    }

    fn segment_count(&self) -> usize {
        self.route.len()
    }

    fn is_degenerate(&self) -> bool {
        self.length() < MIN_ROUTE_LENGTH
    }

    // raw in [0, 1) spans the whole curve, one segment per control point
    fn sample_raw(&self, raw: f32) -> Vec2 {
        self.curve.position(raw * self.segment_count() as f32)
    }

    fn raw_parameter(&self, parameter: f32) -> f32 {
        match self.parameterization {
            Parameterization::Uniform => parameter,
            Parameterization::ArcLength if self.is_degenerate() => parameter,
            Parameterization::ArcLength => self.raw_from_arc_fraction(parameter),
        }
    }

    fn raw_from_arc_fraction(&self, fraction: f32) -> f32 {
        let divisions = self.arc_lengths.len() - 1;
        let target = fraction * self.length();
        let upper = self.arc_lengths.partition_point(|&length| length < target);
        if upper == 0 {
            return 0.0;
        }
        if upper > divisions {
            return 1.0;
        }

        let lower_length = self.arc_lengths[upper - 1];
        let span = self.arc_lengths[upper] - lower_length;
        let local = if span > 0.0 { (target - lower_length) / span } else { 0.0 };
        ((upper - 1) as f32 + local) / divisions as f32
    }

    fn build_arc_table(&self) -> Vec<f32> {
        let divisions = self.segment_count() * ARC_SAMPLES_PER_SEGMENT;
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut total = 0.0;
        let mut previous = self.sample_raw(0.0);
        lengths.push(0.0);
        for i in 1..=divisions {
            let point = self.sample_raw(i as f32 / divisions as f32);
            total += point.distance(previous);
            lengths.push(total);
            previous = point;
        }
        lengths
    }
}
