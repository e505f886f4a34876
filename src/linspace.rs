use num::Float;

/// Evenly spaced samples over a closed interval, like `numpy.linspace`
pub struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(num_steps) if n > 1 => (max - min) / num_steps,
            _ => F::zero(),
        };

        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        // Calculate the value just like numpy.linspace does
        let i = F::from(self.index)?;
        self.index += 1;

        Some(self.start + self.step * i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let points: Vec<f64> = Linspace::new(0., 10., 21).collect();

    assert_eq!(points.len(), 21);
    assert_eq!(points[1], 0.5);
    assert_eq!(points[20], 10.);

    let single: Vec<f64> = Linspace::new(3., 7., 1).collect();

    assert_eq!(single, vec![3.]);
    assert_eq!(Linspace::<f64>::new(0., 1., 0).count(), 0);
}
