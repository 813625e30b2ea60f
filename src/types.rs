use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CustomerId(pub u64);

/// One replenishment policy on the sweep grid.
///
/// Ordering is (period, quantity) ascending, which is also the grid
/// traversal order used to break ties between equal mean profits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridCell {
    pub period: u32,
    pub quantity: u32,
}

impl GridCell {
    pub fn new(period: u32, quantity: u32) -> Self {
        GridCell { period, quantity }
    }
}
