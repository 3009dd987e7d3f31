use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::game::{
    range, unit, EDGE_OFFSET_MAX, EDGE_OFFSET_MIN, EDGE_SIZE_MAX, EDGE_SIZE_MIN, EDGE_TILT_MAX,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Outer border; never interlocks.
    Flat,
    /// Protrudes out of the piece.
    Tab,
    /// Recessed into the piece.
    Blank,
}

impl EdgeType {
    pub fn inverted(self) -> Self {
        match self {
            EdgeType::Flat => EdgeType::Flat,
            EdgeType::Tab => EdgeType::Blank,
            EdgeType::Blank => EdgeType::Tab,
        }
    }

    /// +1 outward, -1 inward, 0 for a straight edge.
    pub fn protrusion(self) -> f32 {
        match self {
            EdgeType::Flat => 0.0,
            EdgeType::Tab => 1.0,
            EdgeType::Blank => -1.0,
        }
    }
}

/// Shape of one side of a piece, expressed in the direction that piece walks
/// its outline (clockwise on screen).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub kind: EdgeType,
    /// Knob scale relative to the nominal knob, in `[0.8, 1.2]`.
    pub size: f32,
    /// Knob centre along the edge as a fraction of its length.
    pub offset: f32,
    /// Lean of the knob, in edge-length units.
    pub tilt: f32,
}

impl EdgeDescriptor {
    pub const FLAT: EdgeDescriptor = EdgeDescriptor {
        kind: EdgeType::Flat,
        size: 1.0,
        offset: 0.5,
        tilt: 0.0,
    };

    pub fn is_flat(&self) -> bool {
        self.kind == EdgeType::Flat
    }

    /// The same shared edge as seen by the piece on the other side of it,
    /// which walks the line in the opposite direction.
    ///
    /// This is the only place a descriptor is flipped; outline building takes
    /// its input as already oriented.
    pub fn mirrored(&self) -> Self {
        if self.is_flat() {
            return *self;
        }
        Self {
            kind: self.kind.inverted(),
            size: self.size,
            offset: 1.0 - self.offset,
            tilt: -self.tilt,
        }
    }

    /// Whether `other` is this edge seen from the neighboring piece.
    pub fn complements(&self, other: &EdgeDescriptor, tolerance: f32) -> bool {
        if self.is_flat() || other.is_flat() {
            return false;
        }
        self.kind == other.kind.inverted()
            && (self.size - other.size).abs() <= tolerance
            && (self.offset - (1.0 - other.offset)).abs() <= tolerance
            && (self.tilt + other.tilt).abs() <= tolerance
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let kind = if unit(rng) < 0.5 {
            EdgeType::Tab
        } else {
            EdgeType::Blank
        };
        let size = range(rng, EDGE_SIZE_MIN, EDGE_SIZE_MAX);
        let offset = range(rng, EDGE_OFFSET_MIN, EDGE_OFFSET_MAX);
        let tilt = range(rng, -EDGE_TILT_MAX, EDGE_TILT_MAX);
        Self {
            kind,
            size,
            offset,
            tilt,
        }
    }
}

/// Canonical descriptors for every interior grid line.
///
/// Horizontal lines are canonical left to right and vertical lines top to
/// bottom. `horizontal[(line - 1) * cols + col]` is the line between rows
/// `line - 1` and `line`; `vertical[row * (cols - 1) + line - 1]` the line
/// between columns `line - 1` and `line`.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGrid {
    cols: usize,
    rows: usize,
    horizontal: Vec<EdgeDescriptor>,
    vertical: Vec<EdgeDescriptor>,
}

impl EdgeGrid {
    /// Draws all horizontal interior lines (row-major), then all vertical
    /// ones. Each line consumes four draws: type, size, offset, tilt.
    pub fn generate<R: RngCore + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Self {
        let h_count = rows.saturating_sub(1) * cols;
        let v_count = rows * cols.saturating_sub(1);
        let mut horizontal = Vec::with_capacity(h_count);
        for _ in 0..h_count {
            horizontal.push(EdgeDescriptor::random(rng));
        }
        let mut vertical = Vec::with_capacity(v_count);
        for _ in 0..v_count {
            vertical.push(EdgeDescriptor::random(rng));
        }
        Self {
            cols,
            rows,
            horizontal,
            vertical,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Line `line` (0..=rows) under column `col`, in canonical direction.
    pub fn horizontal(&self, line: usize, col: usize) -> EdgeDescriptor {
        if line == 0 || line >= self.rows || col >= self.cols {
            return EdgeDescriptor::FLAT;
        }
        self.horizontal[(line - 1) * self.cols + col]
    }

    /// Line `line` (0..=cols) beside row `row`, in canonical direction.
    pub fn vertical(&self, row: usize, line: usize) -> EdgeDescriptor {
        if line == 0 || line >= self.cols || row >= self.rows {
            return EdgeDescriptor::FLAT;
        }
        self.vertical[row * (self.cols - 1) + line - 1]
    }

    pub fn interior_lines(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    /// `[top, right, bottom, left]` as walked clockwise by the piece at
    /// `(row, col)`. Top and right follow the canonical direction; bottom and
    /// left are walked backwards and therefore mirrored.
    pub fn piece_edges(&self, row: usize, col: usize) -> [EdgeDescriptor; 4] {
        let top = self.horizontal(row, col);
        let right = self.vertical(row, col + 1);
        let bottom = self.horizontal(row + 1, col).mirrored();
        let left = self.vertical(row, col).mirrored();
        [top, right, bottom, left]
    }
}
