//! Diagonal scan order over an N x N coefficient block, low frequencies first.

/// The zigzag permutation of an N x N block together with its inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZigzagOrder {
    size: usize,
    order: Vec<(usize, usize)>,
    rank: Vec<usize>,
}

impl ZigzagOrder {
    pub fn new(size: usize) -> ZigzagOrder {
        let order = zigzag_order(size);
        let rank = rank_table(size, &order);
        ZigzagOrder { size, order, rank }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// (row, col) pairs in scan order.
    pub fn order(&self) -> &[(usize, usize)] {
        &self.order
    }

    /// Position of (row, col) in the scan.
    pub fn rank(&self, row: usize, col: usize) -> usize {
        self.rank[row * self.size + col]
    }

    /// Scan position indexed by `row * N + col`.
    pub fn ranks(&self) -> &[usize] {
        &self.rank
    }

    /// Whether the coefficient survives when only the first `keep` scan
    /// positions are retained.
    pub fn is_kept(&self, row: usize, col: usize, keep: usize) -> bool {
        self.rank(row, col) < keep
    }
}

/// Walks the anti-diagonals `row + col = s`. Even diagonals run from the
/// bottom-left cell up to the top-right one, odd diagonals the other way.
pub fn zigzag_order(size: usize) -> Vec<(usize, usize)> {
    let mut order = Vec::with_capacity(size * size);
    if size == 0 {
        return order;
    }

    for s in 0..=2 * (size - 1) {
        let low = s.saturating_sub(size - 1);
        let high = s.min(size - 1);
        if s % 2 == 0 {
            for row in (low..=high).rev() {
                order.push((row, s - row));
            }
        } else {
            for col in (low..=high).rev() {
                order.push((s - col, col));
            }
        }
    }
    order
}

/// Inverse of [`zigzag_order`]: entry `row * N + col` is that cell's scan position.
pub fn coord_to_rank(size: usize) -> Vec<usize> {
    rank_table(size, &zigzag_order(size))
}

fn rank_table(size: usize, order: &[(usize, usize)]) -> Vec<usize> {
    let mut rank = vec![0; size * size];
    for (position, &(row, col)) in order.iter().enumerate() {
        rank[row * size + col] = position;
    }
    rank
}
