use std::ops::RangeInclusive;

use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;

const MAX_POINTS: usize = 10_000_000;

/// The discretized domain a linguistic variable is defined over.
///
/// Always strictly increasing, finite and at least two points long.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    points: Vec<f64>,
}

impl Universe {
    pub fn new(points: impl Into<Vec<f64>>) -> Result<Self> {
        let points = points.into();

        if points.len() < 2 {
            return Err(FuzzyError::InvalidUniverse(format!(
                "need at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(FuzzyError::InvalidUniverse(format!("point {p} is not finite")));
        }
        if let Some(w) = points.windows(2).find(|w| w[0] >= w[1]) {
            return Err(FuzzyError::InvalidUniverse(format!(
                "points must be strictly increasing, found {} then {}",
                w[0], w[1]
            )));
        }

        Ok(Self { points })
    }

    /// Points `start, start + step, ...` up to and including the range end
    /// when it falls on the grid.
    pub fn arange(range: RangeInclusive<f64>, step: f64) -> Result<Self> {
        let min_u = *range.start();
        let max_u = *range.end();

        if !(step.is_finite() && step > 0.) {
            return Err(FuzzyError::InvalidUniverse(format!("step {step} must be positive")));
        }
        if !(min_u.is_finite() && max_u.is_finite() && min_u < max_u) {
            return Err(FuzzyError::InvalidUniverse(format!("empty range {min_u}..={max_u}")));
        }

        // floor is closest approx to what python does for int() conversion, nudged up so that
        // 0.3 / 0.1 == 2.9999999999999996 still counts as three whole steps
        let steps = ((max_u - min_u) / step * (1. + 1e-12)).floor();

        if !(steps.is_finite() && steps < MAX_POINTS as f64) {
            return Err(FuzzyError::InvalidUniverse(format!(
                "{min_u}..={max_u} by {step} needs more than {MAX_POINTS} points"
            )));
        }

        let num = steps as usize + 1;
        let mut last = min_u + step * steps;

        // Land exactly on the declared end when the grid reaches it
        if (max_u - last).abs() <= step * 1e-9 {
            last = max_u;
        }

        let mut points: Vec<f64> = Linspace::new(min_u, last, num).collect();

        if let Some(end) = points.last_mut() {
            *end = last;
        }

        Self::new(points)
    }

    pub fn linspace(range: RangeInclusive<f64>, n: usize) -> Result<Self> {
        Self::new(Linspace::new(*range.start(), *range.end(), n).collect::<Vec<_>>())
    }

    pub fn min(&self) -> f64 {
        self.points[0]
    }

    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether `x` lies within `[min, max]`. NaN never does.
    pub fn contains(&self, x: f64) -> bool {
        self.min() <= x && x <= self.max()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }
}

#[test]
fn test_arange() {
    let age = Universe::arange(0. ..=100., 1.).unwrap();

    assert_eq!(age.len(), 101);
    assert_eq!(age.min(), 0.);
    assert_eq!(age.max(), 100.);
    assert_eq!(age.points()[42], 42.);

    let sex = Universe::arange(0. ..=1., 1.).unwrap();

    assert_eq!(sex.points(), &[0., 1.]);

    // The end is dropped when the step overshoots it
    let coarse = Universe::arange(0. ..=10., 3.).unwrap();

    assert_eq!(coarse.points(), &[0., 3., 6., 9.]);
}

#[test]
fn test_arange_fractional_step() {
    let tenths = Universe::arange(0. ..=0.3, 0.1).unwrap();

    assert_eq!(tenths.len(), 4);
    assert_eq!(tenths.max(), 0.3);
    assert!(tenths.contains(0.3));

    let sevenths = Universe::arange(0. ..=0.7, 0.1).unwrap();

    assert_eq!(sevenths.len(), 8);
    assert_eq!(sevenths.max(), 0.7);

    let ratio = Universe::arange(0.1..=1., 0.01).unwrap();

    assert_eq!(ratio.len(), 91);
    assert_eq!(ratio.max(), 1.);
}

#[test]
fn test_arange_too_many_points() {
    assert!(matches!(
        Universe::arange(0. ..=1e300, 1e-300),
        Err(FuzzyError::InvalidUniverse(_))
    ));
    assert!(matches!(
        Universe::arange(0. ..=1e9, 1e-3),
        Err(FuzzyError::InvalidUniverse(_))
    ));
}

#[test]
fn test_invalid_universe() {
    assert!(matches!(Universe::new(vec![1.]), Err(FuzzyError::InvalidUniverse(_))));
    assert!(matches!(Universe::new(vec![0., 2., 1.]), Err(FuzzyError::InvalidUniverse(_))));
    assert!(matches!(Universe::new(vec![0., 0.]), Err(FuzzyError::InvalidUniverse(_))));
    assert!(matches!(Universe::new(vec![0., f64::NAN]), Err(FuzzyError::InvalidUniverse(_))));
    assert!(matches!(Universe::arange(0. ..=1., 0.), Err(FuzzyError::InvalidUniverse(_))));
    assert!(matches!(Universe::arange(5. ..=1., 1.), Err(FuzzyError::InvalidUniverse(_))));
    assert!(matches!(Universe::linspace(0. ..=1., 1), Err(FuzzyError::InvalidUniverse(_))));
}

#[test]
fn test_contains() {
    let bp = Universe::arange(90. ..=200., 1.).unwrap();

    assert!(bp.contains(90.));
    assert!(bp.contains(200.));
    assert!(bp.contains(137.5));
    assert!(!bp.contains(89.9));
    assert!(!bp.contains(f64::NAN));
}
