/// Round-robin comparison schedule.
///
/// Every unordered pair `(i, j)` with `i < j` is visited exactly once, in
/// nested ascending order: `(0,1), (0,2), .., (0,n-1), (1,2), ..`. The order is
/// observable (it decides which question is asked first) so it must not change.
use std::iter::FusedIterator;

/// Number of comparisons a full round-robin over `num_items` tasks needs.
pub fn total_comparisons(num_items: usize) -> usize {
    num_items * num_items.saturating_sub(1) / 2
}

/// Iterator over the index pairs of a full round-robin.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    num_items: usize,
    first: usize,
    second: usize,
    remaining: usize,
}

impl RoundRobin {
    pub fn new(num_items: usize) -> Self {
        RoundRobin {
            num_items,
            first: 0,
            second: 1,
            remaining: total_comparisons(num_items),
        }
    }
}

impl Iterator for RoundRobin {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.second >= self.num_items {
            return None;
        }

        let pair = (self.first, self.second);
        self.second += 1;
        if self.second == self.num_items {
            self.first += 1;
            self.second = self.first + 1;
        }
        self.remaining -= 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RoundRobin {}

impl FusedIterator for RoundRobin {}
