use super::{Environment, ExitEvacuationProblem};
use serde::{Deserialize, Serialize};

/// Lengths below this are treated as zero when walking the perimeter
const EPSILON: f64 = 1e-9;

/// Wall of the rectangular environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

impl Edge {
    /// Perimeter order, matching `Environment::edge_lengths`
    const ORDER: [Edge; 4] = [Edge::Bottom, Edge::Right, Edge::Top, Edge::Left];
}

/// A straight opening on one wall. An exit wrapping a corner decodes to two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Access {
    pub id: usize,
    /// Index of the gene this access was decoded from
    pub exit: usize,
    pub edge: Edge,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub width: f64,
}

/// Maps perimeter locations to physical accesses.
#[derive(Debug, Clone)]
pub struct ExitDecoder {
    environment: Environment,
}

impl ExitDecoder {
    pub fn new(problem: &ExitEvacuationProblem) -> Self {
        Self {
            environment: problem.environment().clone(),
        }
    }

    /// Decode the exit starting at `location` (perimeter units) into one
    /// access per wall it touches. Ids are assigned from `first_id` upwards.
    pub fn decode_access(&self, location: f64, exit: usize, first_id: usize) -> Vec<Access> {
        let lengths = self.environment.edge_lengths();
        let position = location.rem_euclid(self.environment.perimeter_length());
        let (mut edge, mut offset) = self.locate(position);

        // Sitting on a corner: start from the next wall's origin.
        if lengths[edge] - offset <= EPSILON {
            edge = (edge + 1) % lengths.len();
            offset = 0.0;
        }

        let mut remaining = self.environment.exit_width;
        let mut accesses = Vec::new();

        // An exit is never wider than the perimeter, so it touches at most
        // one wall twice.
        for _ in 0..=lengths.len() {
            if remaining <= EPSILON {
                break;
            }
            let span = remaining.min(lengths[edge] - offset);
            let wall = Edge::ORDER[edge];
            accesses.push(Access {
                id: first_id + accesses.len(),
                exit,
                edge: wall,
                start: self.point(wall, offset),
                end: self.point(wall, offset + span),
                width: span,
            });

            remaining -= span;
            edge = (edge + 1) % lengths.len();
            offset = 0.0;
        }

        accesses
    }

    /// Index of the wall containing a perimeter position and the distance
    /// along it, clamped to the wall's length.
    fn locate(&self, position: f64) -> (usize, f64) {
        let lengths = self.environment.edge_lengths();
        let mut start = 0.0;
        for (i, length) in lengths.iter().enumerate() {
            if position < start + length {
                return (i, (position - start).clamp(0.0, *length));
            }
            start += length;
        }
        // Rounding can leave the position past the summed edge lengths.
        let last = lengths.len() - 1;
        (last, lengths[last])
    }

    fn point(&self, edge: Edge, offset: f64) -> (f64, f64) {
        let (w, h) = (self.environment.width, self.environment.height);
        match edge {
            Edge::Bottom => (offset, 0.0),
            Edge::Right => (w, offset),
            Edge::Top => (w - offset, h),
            Edge::Left => (0.0, h - offset),
        }
    }
}
