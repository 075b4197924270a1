use std::collections::VecDeque;

/// Default number of points kept per axis.
pub const MAX_POINTS: usize = 100;

/// Fixed-capacity FIFO of `(timestamp, value)` pairs for one axis.
///
/// Entries are kept in insertion order, which is also chronological order.
/// Pushing onto a full series drops the oldest entry.
#[derive(Clone, Debug, PartialEq)]
pub struct RollingSeries {
    points: VecDeque<(u64, f64)>,
    capacity: usize,
}

impl Default for RollingSeries {
    fn default() -> Self {
        Self::new(MAX_POINTS)
    }
}

impl RollingSeries {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, timestamp: u64, value: f64) {
        debug_assert!(
            self.points.back().map_or(true, |&(last, _)| timestamp > last),
            "timestamps must be strictly increasing"
        );

        self.points.push_back((timestamp, value));

        // 超出容量时丢弃最旧的数据
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<(u64, f64)> {
        self.points.front().copied()
    }

    pub fn last(&self) -> Option<(u64, f64)> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u64, f64)> + '_ {
        self.points.iter()
    }

    pub fn timestamps(&self) -> Vec<u64> {
        self.points.iter().map(|&(t, _)| t).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    /// Points as `[timestamp, value]` pairs, ready for plotting.
    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|&(t, v)| [t as f64, v]).collect()
    }

    /// Smallest and largest value, `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), &(_, v)| (min.min(v), max.max(v)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_most_recent_entries_in_order() {
        let mut series = RollingSeries::new(5);
        for t in 0..12u64 {
            series.push(t, t as f64 * 0.5);
            assert!(series.len() <= 5);
        }

        assert_eq!(series.timestamps(), vec![7, 8, 9, 10, 11]);
        assert_eq!(series.values(), vec![3.5, 4.0, 4.5, 5.0, 5.5]);
        assert_eq!(series.first(), Some((7, 3.5)));
        assert_eq!(series.last(), Some((11, 5.5)));
    }

    #[test]
    fn partially_filled_series_holds_everything() {
        let mut series = RollingSeries::default();
        for t in 0..30u64 {
            series.push(t, 1.0);
        }
        assert_eq!(series.len(), 30);
        assert_eq!(series.capacity(), MAX_POINTS);
        assert_eq!(series.timestamps(), (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn value_range_and_clear() {
        let mut series = RollingSeries::new(10);
        assert_eq!(series.value_range(), None);

        series.push(0, -1.25);
        series.push(1, 3.0);
        series.push(2, 0.5);
        assert_eq!(series.value_range(), Some((-1.25, 3.0)));
        assert_eq!(series.plot_points()[1], [1.0, 3.0]);

        series.clear();
        assert!(series.is_empty());
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut series = RollingSeries::new(0);
        series.push(0, 1.0);
        series.push(1, 2.0);
        assert_eq!(series.len(), 1);
        assert_eq!(series.last(), Some((1, 2.0)));
    }
}
