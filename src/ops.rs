use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp_one;

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
        }
    }
}

/// Implication operator method for shaping a consequence term by the
/// firing strength of its rule.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Mamdani: clip the term at the firing strength
    #[default]
    Min,
    /// Larsen: scale the term by the firing strength
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, membership: F) -> F {
        match self {
            Self::Min => F::min(strength, membership),
            Self::Prod => strength * membership,
        }
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionLink {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl ProductionLink {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => OrOp::Max.call(u, v),
            Self::ProbOr => OrOp::ProbOr.call(u, v),
            Self::BoundedSum => OrOp::BoundedSum.call(u, v),
            Self::DrasticSum => OrOp::DrasticSum.call(u, v),
        }
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Membership-weighted mean of the universe points
    #[default]
    Centroid,
    /// Center of Gravity of the piecewise-linear area
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Returns `None` when `membership` has no mass, in which case no crisp
    /// value exists.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        let two = F::one() + F::one();

        match self {
            Self::Centroid => {
                let mut num = F::zero();
                let mut den = F::zero();

                for (&u, &m) in universe.iter().zip(membership) {
                    num = num + u * m;
                    den = den + m;
                }

                (den > F::zero()).then(|| num / den)
            },
            Self::Cog => {
                let three = two + F::one();
                let mut num = F::zero();
                let mut den = F::zero();

                for (u, m) in universe.windows(2).zip(membership.windows(2)) {
                    let base = u[1] - u[0];
                    let area_rect = F::min(m[0], m[1]) * base;
                    let center_rect = u[0] + base / two;
                    let area_tria = base * F::abs(m[1] - m[0]) / two;
                    let center_tria = if m[1] > m[0] {
                        u[0] + two / three * base
                    } else {
                        u[0] + F::one() / three * base
                    };

                    num = num + area_rect * center_rect + area_tria * center_tria;
                    den = den + area_rect + area_tria;
                }

                (den > F::zero()).then(|| num / den)
            },
            Self::Boa => {
                let areas: Vec<F> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
                    .collect();
                let total = areas.iter().fold(F::zero(), |acc, &a| acc + a);

                if total <= F::zero() {
                    return None;
                }

                let target = total / two;
                let mut cum_area = F::zero();

                for (i, &area) in areas.iter().enumerate() {
                    if cum_area + area >= target {
                        let coords = [(cum_area, universe[i]), (cum_area + area, universe[i + 1])];

                        return Some(interp_one(target, &coords));
                    }

                    cum_area = cum_area + area;
                }

                universe.last().copied()
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(F::zero(), F::max);

                if maximum <= F::zero() {
                    return None;
                }

                let mut maxima = universe
                    .iter()
                    .zip(membership)
                    .filter_map(|(&u, &m)| (m == maximum).then_some(u));

                match self {
                    Self::Lom => maxima.last(),
                    Self::Som => maxima.next(),
                    _ => {
                        let (len, sum) = maxima.fold((F::zero(), F::zero()), |(len, sum), u| (len + F::one(), sum + u));

                        Some(sum / len)
                    },
                }
            },
        }
    }
}

#[test]
fn test_t_norms() {
    assert_eq!(AndOp::Min.call(0.3, 0.8), 0.3);
    assert_eq!(AndOp::Prod.call(0.5, 0.5), 0.25);
    assert_eq!(AndOp::BoundedProd.call(0.25, 0.5), 0.);
    assert_eq!(AndOp::BoundedProd.call(0.75, 0.5), 0.25);
    assert_eq!(AndOp::DrasticProd.call(0.4, 1.), 0.4);
    assert_eq!(AndOp::DrasticProd.call(0.4, 0.9), 0.);

    assert_eq!(OrOp::Max.call(0.3, 0.8), 0.8);
    assert_eq!(OrOp::ProbOr.call(0.5, 0.5), 0.75);
    assert_eq!(OrOp::BoundedSum.call(0.75, 0.5), 1.);
    assert_eq!(OrOp::DrasticSum.call(0.4, 0.), 0.4);
    assert_eq!(OrOp::DrasticSum.call(0.4, 0.1), 1.);
}

#[test]
fn test_zero_strength_is_identity() {
    for imp in [ImplicationOp::Min, ImplicationOp::Prod] {
        for link in [
            ProductionLink::Max,
            ProductionLink::ProbOr,
            ProductionLink::BoundedSum,
            ProductionLink::DrasticSum,
        ] {
            assert_eq!(link.call(0.4, imp.call(0., 0.9)), 0.4);
        }
    }
}

#[test]
fn test_centroid() {
    let universe = [0., 1., 2.];

    assert_eq!(DefuzzificationOp::Centroid.call(&universe, &[0.5, 0., 0.]), Some(0.));
    assert_eq!(DefuzzificationOp::Centroid.call(&universe, &[0., 0.25, 0.]), Some(1.));
    assert_eq!(DefuzzificationOp::Centroid.call(&universe, &[0., 0., 0.25]), Some(2.));
    assert_eq!(DefuzzificationOp::Centroid.call(&universe, &[0.5, 0., 0.5]), Some(1.));
    assert_eq!(DefuzzificationOp::Centroid.call(&universe, &[0., 0., 0.]), None);
}

#[test]
fn test_cog() {
    // Symmetric triangle centred on 2
    let universe = [0., 1., 2., 3., 4.];
    let membership = [0., 0.5, 1., 0.5, 0.];

    let cog = DefuzzificationOp::Cog.call(&universe, &membership).unwrap();

    assert!((cog - 2.).abs() < 1e-12);

    // Single right triangle over [0, 1] has its centroid at 1/3
    let cog = DefuzzificationOp::Cog.call(&[0., 1.], &[1., 0.]).unwrap();

    assert!((cog - 1. / 3.).abs() < 1e-12);
    assert_eq!(DefuzzificationOp::Cog.call(&universe, &[0.; 5]), None);
}

#[test]
fn test_boa() {
    let universe = [0., 1., 2., 3., 4.];

    assert_eq!(DefuzzificationOp::Boa.call(&universe, &[1.; 5]), Some(2.));
    assert_eq!(DefuzzificationOp::Boa.call(&universe, &[0., 0.5, 1., 0.5, 0.]), Some(2.));
    assert_eq!(DefuzzificationOp::Boa.call(&universe, &[0.; 5]), None);
}

#[test]
fn test_maxima() {
    let universe = [0., 1., 2., 3., 4.];
    let membership = [0.2, 0.7, 0.7, 0.7, 0.1];

    assert_eq!(DefuzzificationOp::Mom.call(&universe, &membership), Some(2.));
    assert_eq!(DefuzzificationOp::Som.call(&universe, &membership), Some(1.));
    assert_eq!(DefuzzificationOp::Lom.call(&universe, &membership), Some(3.));
    assert_eq!(DefuzzificationOp::Mom.call(&universe, &[0.; 5]), None);
}

#[test]
fn test_ops_config_names() {
    let op: DefuzzificationOp = serde_json::from_str("\"boa\"").unwrap();

    assert_eq!(op, DefuzzificationOp::Boa);
    assert_eq!(serde_json::to_string(&AndOp::BoundedProd).unwrap(), "\"bounded_prod\"");
}
