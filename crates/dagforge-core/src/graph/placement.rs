use crate::model::Position;

/// Where newly added nodes are dropped.
///
/// Coordinates are presentation data; the store only needs *some*
/// deterministic spot for a fresh node. Nodes fill a grid row by row,
/// starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub origin: Position,
    pub spacing: f64,
    pub columns: usize,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            origin: Position::new(40.0, 40.0),
            spacing: 120.0,
            columns: 6,
        }
    }
}

impl Placement {
    /// Position for the node that will become the `index`-th node (0-based).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn slot(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        let col = (index % columns) as f64;
        let row = (index / columns) as f64;
        Position::new(
            self.origin.x + col * self.spacing,
            self.origin.y + row * self.spacing,
        )
    }
}
