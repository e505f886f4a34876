use fuzzy_rx::medical::PrescriptionModel;
use fuzzy_rx::{
    ControlSystem, DefuzzificationOp, Expr, ImplicationOp, Inputs, Key, MamdaniInference, MembershipFunction, ProductionLink,
    Rules, Terms, Universe, Variables,
};
use proptest::prelude::*;

#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
enum Level {
    Low,
    Mid,
    High,
}

fn level_terms() -> Terms<Level> {
    Terms::new()
        .with(Level::Low, MembershipFunction::triangular(0., 0., 5.))
        .and_then(|t| t.with(Level::Mid, MembershipFunction::triangular(0., 5., 10.)))
        .and_then(|t| t.with(Level::High, MembershipFunction::triangular(5., 10., 10.)))
        .unwrap()
}

fn defuzzifiers() -> [DefuzzificationOp; 6] {
    [
        DefuzzificationOp::Centroid,
        DefuzzificationOp::Cog,
        DefuzzificationOp::Boa,
        DefuzzificationOp::Mom,
        DefuzzificationOp::Lom,
        DefuzzificationOp::Som,
    ]
}

fn level() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::Low), Just(Level::Mid), Just(Level::High)]
}

fn triangle() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0..100.0, 0.1..50.0, 0.1..50.0).prop_map(|(a, left, right)| (a, a + left, a + left + right))
}

fn contributions() -> impl Strategy<Value = (Vec<(Level, f64)>, Vec<(Level, f64)>)> {
    (0.0..=1.0, 0.0..=1.0, 0.0..=1.0, 0.0..=1.0).prop_flat_map(|(low, mid, high, again)| {
        // Mid appears twice, as two rules with the same consequence would
        let ordered = vec![(Level::Low, low), (Level::Mid, mid), (Level::High, high), (Level::Mid, again)];

        (Just(ordered.clone()), Just(ordered).prop_shuffle())
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_triangle_shape((a, b, c) in triangle(), t in 0.0..=1.0f64, s in 0.0..=1.0f64) {
        let mf = MembershipFunction::triangular(a, b, c).unwrap();

        prop_assert_eq!(mf.membership(a), 0.);
        prop_assert_eq!(mf.membership(b), 1.);
        prop_assert_eq!(mf.membership(c), 0.);
        prop_assert_eq!(mf.membership(a - 1.), 0.);
        prop_assert_eq!(mf.membership(c + 1.), 0.);

        // Non-decreasing up to the peak, non-increasing after it
        let (lo, hi) = if t <= s { (t, s) } else { (s, t) };
        let rising = |f: f64| (a + f * (b - a)).min(b);
        let falling = |f: f64| (b + f * (c - b)).max(b);

        prop_assert!(mf.membership(rising(lo)) <= mf.membership(rising(hi)));
        prop_assert!(mf.membership(falling(lo)) >= mf.membership(falling(hi)));

        let degree = mf.membership(rising(t));

        prop_assert!((0.0..=1.0).contains(&degree));
    }

    #[test]
    fn prop_connectives_are_min_and_max(
        x in 0.0..=10.0f64,
        y in 0.0..=10.0f64,
        a in level(),
        b in level(),
        c in level(),
    ) {
        let mut vars = Variables::<Level>::new();
        let universe = Universe::arange(0. ..=10., 1.).unwrap();
        let xv = vars.add_antecedent("x", universe.clone(), level_terms()).unwrap();
        let yv = vars.add_antecedent("y", universe.clone(), level_terms()).unwrap();
        let out = vars.add_consequent("out", universe, level_terms()).unwrap();

        let premises: [Expr<Level>; 11] = [
            xv.is(a),
            yv.is(b),
            xv.is(c),
            xv.is(a).and(yv.is(b)),
            yv.is(b).and(xv.is(a)),
            xv.is(a).or(yv.is(b)),
            yv.is(b).or(xv.is(a)),
            xv.is(a).and(yv.is(b)).and(xv.is(c)),
            xv.is(a).and(yv.is(b).and(xv.is(c))),
            xv.is(a).or(yv.is(b)).or(xv.is(c)),
            xv.is(a).or(yv.is(b).or(xv.is(c))),
        ];
        let mut rules = Rules::new();

        for premise in premises {
            rules.add(premise, out.term(Level::Mid));
        }

        let system = ControlSystem::new(vars, rules, MamdaniInference::default()).unwrap();
        let mut inputs = Inputs::new();

        inputs.add(xv, x);
        inputs.add(yv, y);

        let outputs = system.compute(&inputs).unwrap();
        let s = outputs.firing_strengths();
        let (xa, yb, xc) = (s[0], s[1], s[2]);

        prop_assert_eq!(s[3], xa.min(yb));
        prop_assert_eq!(s[4], s[3]);
        prop_assert_eq!(s[5], xa.max(yb));
        prop_assert_eq!(s[6], s[5]);
        prop_assert_eq!(s[7], s[8]);
        prop_assert_eq!(s[7], xa.min(yb).min(xc));
        prop_assert_eq!(s[9], s[10]);
        prop_assert_eq!(s[9], xa.max(yb).max(xc));
    }

    #[test]
    fn prop_aggregation_ignores_rule_order((ordered, shuffled) in contributions()) {
        let mut vars = Variables::<Level>::new();
        let level = vars
            .add_consequent("level", Universe::linspace(0. ..=10., 21).unwrap(), level_terms())
            .unwrap();
        let var = vars.get(level.key()).unwrap();

        let expected = var.aggregate(ordered, ImplicationOp::Min, ProductionLink::Max).unwrap();
        let actual = var.aggregate(shuffled, ImplicationOp::Min, ProductionLink::Max).unwrap();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_centroid_follows_translation(
        membership in prop::collection::vec(0.0..=1.0f64, 2..20),
        start in -100.0..100.0f64,
        step in 0.1..10.0f64,
        shift in -100.0..100.0f64,
    ) {
        prop_assume!(membership.iter().sum::<f64>() > 0.);

        let universe: Vec<f64> = (0..membership.len()).map(|i| start + i as f64 * step).collect();
        let shifted: Vec<f64> = universe.iter().map(|x| x + shift).collect();

        let centroid = DefuzzificationOp::Centroid.call(&universe, &membership).unwrap();
        let moved = DefuzzificationOp::Centroid.call(&shifted, &membership).unwrap();

        prop_assert!((moved - (centroid + shift)).abs() < 1e-6);
        prop_assert!(centroid >= universe[0] - 1e-9);
        prop_assert!(centroid <= universe[universe.len() - 1] + 1e-9);
    }

    #[test]
    fn prop_no_mass_without_firing(len in 2usize..30, start in -100.0..100.0f64) {
        let universe: Vec<f64> = (0..len).map(|i| start + i as f64).collect();
        let membership = vec![0.; len];

        for op in defuzzifiers() {
            prop_assert_eq!(op.call(&universe, &membership), None);
        }

        let mut vars = Variables::<Level>::new();
        let level = vars
            .add_consequent("level", Universe::linspace(0. ..=10., 11).unwrap(), level_terms())
            .unwrap();
        let var = vars.get(level.key()).unwrap();
        let aggregated = var
            .aggregate([(Level::Low, 0.), (Level::High, 0.)], ImplicationOp::Min, ProductionLink::Max)
            .unwrap();

        prop_assert!(aggregated.iter().all(|&m| m == 0.));
    }

    #[test]
    fn prop_degrees_stay_in_unit_interval(age in 0.0..=100.0f64, pressure in 90.0..=200.0f64) {
        let model = PrescriptionModel::new().unwrap();
        let vars = model.system().variables();

        for (name, crisp) in [("age", age), ("blood_pressure", pressure)] {
            let (_, var) = vars.find(name).unwrap();

            for (_, degree) in var.fuzzify(crisp).unwrap() {
                prop_assert!((0.0..=1.0).contains(&degree));
            }
        }
    }
}
