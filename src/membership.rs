use crate::error::{FuzzyError, Result};
use crate::math::interp_one;
use crate::universe::Universe;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { mean: f64, sigma: f64 },
    /// Linear between `(x, degree)` points, holding the end degrees beyond them
    Piecewise(Vec<(f64, f64)>),
}

/// Maps a real value to a degree of truth in [0, 1] for one named fuzzy set.
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipFunction(Shape);

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self> {
        check_finite(&[a, b, c])?;

        if !(a <= b && b <= c) {
            return Err(FuzzyError::InvalidShape(format!(
                "triangular breakpoints must satisfy a <= b <= c, got ({a}, {b}, {c})"
            )));
        }

        Ok(Self(Shape::Triangular { a, b, c }))
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        check_finite(&[a, b, c, d])?;

        if !(a <= b && b <= c && c <= d) {
            return Err(FuzzyError::InvalidShape(format!(
                "trapezoidal breakpoints must satisfy a <= b <= c <= d, got ({a}, {b}, {c}, {d})"
            )));
        }

        Ok(Self(Shape::Trapezoidal { a, b, c, d }))
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Result<Self> {
        check_finite(&[mean, sigma])?;

        if sigma <= 0. {
            return Err(FuzzyError::InvalidShape(format!("gaussian sigma must be positive, got {sigma}")));
        }

        Ok(Self(Shape::Gaussian { mean, sigma }))
    }

    pub fn piecewise(points: impl Into<Vec<(f64, f64)>>) -> Result<Self> {
        let points = points.into();

        if points.is_empty() {
            return Err(FuzzyError::InvalidShape("piecewise membership needs at least one point".into()));
        }
        for &(x, degree) in &points {
            check_finite(&[x, degree])?;

            if !(0. ..=1.).contains(&degree) {
                return Err(FuzzyError::InvalidShape(format!("degree {degree} at {x} is outside [0, 1]")));
            }
        }
        if let Some(w) = points.windows(2).find(|w| w[0].0 >= w[1].0) {
            return Err(FuzzyError::InvalidShape(format!(
                "piecewise points must be strictly increasing, found {} then {}",
                w[0].0, w[1].0
            )));
        }

        Ok(Self(Shape::Piecewise(points)))
    }

    pub fn shape(&self) -> &Shape {
        &self.0
    }

    pub fn membership(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.;
        }

        match &self.0 {
            Shape::Triangular { a, b, c } => triangle(x, *a, *b, *c),
            Shape::Trapezoidal { a, b, c, d } => trapezoid(x, *a, *b, *c, *d),
            Shape::Gaussian { mean, sigma } => (-(x - mean).powi(2) / (2. * sigma.powi(2))).exp(),
            Shape::Piecewise(points) => interp_one(x, points),
        }
    }

    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.iter().map(|x| self.membership(x)).collect()
    }
}

fn check_finite(params: &[f64]) -> Result<()> {
    match params.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(FuzzyError::InvalidShape(format!("parameter {p} is not finite"))),
        None => Ok(()),
    }
}

// The ramp branches only run when their denominator is positive: x < b implies
// a <= x < b, and x > b implies b < x <= c.
fn triangle(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x < a || x > c {
        0.
    } else if x == b {
        1.
    } else if x < b {
        (x - a) / (b - a)
    } else {
        (c - x) / (c - b)
    }
}

fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.
    } else if b <= x && x <= c {
        1.
    } else if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}

#[test]
fn test_triangular() {
    let moderate = MembershipFunction::triangular(30., 50., 70.).unwrap();

    assert_eq!(moderate.membership(30.), 0.);
    assert_eq!(moderate.membership(40.), 0.5);
    assert_eq!(moderate.membership(50.), 1.);
    assert_eq!(moderate.membership(55.), 0.75);
    assert_eq!(moderate.membership(70.), 0.);
    assert_eq!(moderate.membership(-1e9), 0.);
    assert_eq!(moderate.membership(f64::INFINITY), 0.);
    assert_eq!(moderate.membership(f64::NAN), 0.);
}

#[test]
fn test_triangular_degenerate() {
    // Left shoulder: a == b
    let young = MembershipFunction::triangular(0., 0., 40.).unwrap();

    assert_eq!(young.membership(0.), 1.);
    assert_eq!(young.membership(10.), 0.75);
    assert_eq!(young.membership(40.), 0.);

    // Right shoulder: b == c
    let severe = MembershipFunction::triangular(60., 100., 100.).unwrap();

    assert_eq!(severe.membership(90.), 0.75);
    assert_eq!(severe.membership(100.), 1.);
    assert_eq!(severe.membership(100.5), 0.);

    // Singleton: a == b == c
    let male = MembershipFunction::triangular(1., 1., 1.).unwrap();

    assert_eq!(male.membership(1.), 1.);
    assert_eq!(male.membership(0.999), 0.);
    assert_eq!(male.membership(0.), 0.);
}

#[test]
fn test_invalid_shapes() {
    assert!(matches!(
        MembershipFunction::triangular(50., 40., 60.),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::triangular(0., 50., 40.),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::triangular(0., f64::NAN, 40.),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::trapezoidal(0., 2., 1., 3.),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(MembershipFunction::gaussian(0., 0.), Err(FuzzyError::InvalidShape(_))));
    assert!(matches!(
        MembershipFunction::piecewise(vec![(1., 0.), (1., 1.)]),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::piecewise(vec![(1., 1.5)]),
        Err(FuzzyError::InvalidShape(_))
    ));
}

#[test]
fn test_other_shapes() {
    let plateau = MembershipFunction::trapezoidal(0., 10., 20., 40.).unwrap();

    assert_eq!(plateau.membership(5.), 0.5);
    assert_eq!(plateau.membership(15.), 1.);
    assert_eq!(plateau.membership(30.), 0.5);
    assert_eq!(plateau.membership(41.), 0.);

    let bell = MembershipFunction::gaussian(5., 2.).unwrap();

    assert_eq!(bell.membership(5.), 1.);
    assert!((bell.membership(7.) - (-0.5f64).exp()).abs() < 1e-12);
    assert_eq!(bell.membership(3.), bell.membership(7.));

    let low = MembershipFunction::piecewise(vec![(155., 1.), (165., 0.5), (175., 0.)]).unwrap();

    assert_eq!(low.membership(150.), 1.);
    assert_eq!(low.membership(160.), 0.75);
    assert_eq!(low.membership(190.), 0.);
}

#[test]
fn test_sample() {
    let universe = Universe::arange(0. ..=2., 1.).unwrap();
    let alendronate = MembershipFunction::triangular(1., 1., 2.).unwrap();

    assert_eq!(alendronate.sample(&universe), vec![0., 1., 0.]);

    let scores = Universe::arange(150. ..=180., 5.).unwrap();
    let low = MembershipFunction::piecewise(vec![(155., 1.), (165., 0.5), (175., 0.)]).unwrap();

    assert_eq!(low.sample(&scores), vec![1., 1., 0.75, 0.5, 0.25, 0., 0.]);
}
