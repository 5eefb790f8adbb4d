use super::NodeId;
use serde::{Deserialize, Serialize};

/// A weighted edge, identified by its `(from, to)` path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
    pub enabled: bool,
}

impl Connection {
    pub fn new(from: NodeId, to: NodeId, weight: f64) -> Self {
        Self {
            from,
            to,
            weight,
            enabled: true,
        }
    }

    #[inline]
    pub fn path(&self) -> (NodeId, NodeId) {
        (self.from, self.to)
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Disable this connection and produce the pair that routes through `center` in its place.
    /// The first carries a unit weight so that the second, which inherits ours, initially
    /// reproduces the old signal
    pub fn bisect(&mut self, center: NodeId) -> (Self, Self) {
        self.disable();
        (
            // from -{1.}> center
            Self::new(self.from, center, 1.),
            // center -{w}> to
            Self::new(center, self.to, self.weight),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bisect() {
        let mut c = Connection::new(-1, 0, 0.25);
        let (first, second) = c.bisect(7);

        assert!(!c.enabled);
        assert_eq!(c.path(), (-1, 0));
        assert_eq!(c.weight, 0.25);

        assert_eq!(first, Connection::new(-1, 7, 1.));
        assert_eq!(second, Connection::new(7, 0, 0.25));
        assert!(first.enabled && second.enabled);
    }
}
