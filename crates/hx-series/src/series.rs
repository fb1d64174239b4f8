//! Ordered (time, value) samples.

/// Samples in file order. Duplicate or decreasing times are kept as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut series = Self::new();
        for (t, v) in points {
            series.push(t, v);
        }
        series
    }

    pub fn push(&mut self, time: f64, value: f64) {
        self.times.push(time);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// `(min, max)` over the finite times, or `None` if there are none.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.times)
    }

    /// `(min, max)` over the finite values, or `None` if there are none.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.values)
    }
}

fn finite_range(xs: &[f64]) -> Option<(f64, f64)> {
    xs.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_file_order() {
        let series = TimeSeries::from_points([(2.0, 20.0), (1.0, 10.0), (2.0, 21.0)]);
        assert_eq!(series.times(), &[2.0, 1.0, 2.0]);
        assert_eq!(series.values(), &[20.0, 10.0, 21.0]);
    }

    #[test]
    fn ranges_skip_non_finite() {
        let series = TimeSeries::from_points([(0.0, f64::NAN), (1.0, 5.0), (3.0, -2.0)]);
        assert_eq!(series.time_range(), Some((0.0, 3.0)));
        assert_eq!(series.value_range(), Some((-2.0, 5.0)));
        assert_eq!(TimeSeries::new().value_range(), None);
    }
}
