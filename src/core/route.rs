use bevy_math::cubic_splines::InsufficientDataError;
use bevy_math::Vec2;
use thiserror::Error;

/// Fewest control points that still close into a loop.
pub const MIN_ROUTE_POINTS: usize = 3;

#[derive(Debug, Error, Clone)]
pub enum RouteError {
    #[error("route needs at least {required} distinct control points to close a loop, found {found}")]
    TooFewPoints { found: usize, required: usize },
    #[error("route control point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("spline fit failed")]
    CurveFit(#[from] InsufficientDataError),
}

/// Closed sequence of control points the car travels along.
///
/// The last point always connects back to the first. A trailing point equal to
/// the first one is dropped on construction, so routes authored as
/// "manually closed" open curves describe the same loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Vec2>,
}

impl Route {
    pub fn new(points: impl IntoIterator<Item = Vec2>) -> Result<Self, RouteError> {
        let mut points: Vec<Vec2> = points.into_iter().collect();

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(RouteError::NonFinitePoint { index });
        }

        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        if points.len() < MIN_ROUTE_POINTS {
            return Err(RouteError::TooFewPoints {
                found: points.len(),
                required: MIN_ROUTE_POINTS,
            });
        }

        Ok(Route { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TryFrom<&[[f32; 2]]> for Route {
    type Error = RouteError;

    fn try_from(points: &[[f32; 2]]) -> Result<Self, Self::Error> {
        Route::new(points.iter().copied().map(Vec2::from))
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::cubic_splines::{CubicCardinalSpline, CyclicCubicGenerator};

    use super::*;

    #[test]
    fn rejects_routes_that_cannot_close() {
        let err = Route::new([Vec2::ZERO, Vec2::X]).unwrap_err();
        assert!(matches!(err, RouteError::TooFewPoints { found: 2, required: 3 }));
    }

    #[test]
    fn drops_repeated_closing_point() {
        let route = Route::new([
            Vec2::new(-10.0, -27.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 27.0),
            Vec2::new(-10.0, -27.0),
        ])
        .unwrap();
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn closing_point_counts_against_minimum() {
        let err = Route::new([Vec2::ZERO, Vec2::X, Vec2::ZERO]).unwrap_err();
        assert!(matches!(err, RouteError::TooFewPoints { found: 2, .. }));
    }

    #[test]
    fn rejects_nan_points() {
        let err = Route::new([Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::Y]).unwrap_err();
        assert!(matches!(err, RouteError::NonFinitePoint { index: 1 }));
    }

    #[test]
    fn curve_fit_error_keeps_its_source() {
        use std::error::Error as _;

        let fit = CubicCardinalSpline::new_catmull_rom([Vec2::ZERO])
            .to_curve_cyclic()
            .unwrap_err();
        let err = RouteError::from(fit);
        assert!(err.source().is_some());
    }
}
