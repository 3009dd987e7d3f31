use rand::RngCore;

use crate::edge::{EdgeDescriptor, EdgeGrid};
use crate::error::LayoutError;
use crate::game::{ShapeRng, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP, MAX_PIECES};

pub type PieceId = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct PieceRecord {
    pub id: PieceId,
    pub col: u32,
    pub row: u32,
    /// `[top, right, bottom, left]`, oriented for this piece.
    pub edges: [EdgeDescriptor; 4],
    pub solved_x: f32,
    pub solved_y: f32,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    pub is_placed: bool,
    pub group_id: PieceId,
    pub z_index: u32,
    pub in_tray: bool,
}

impl PieceRecord {
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn solved_position(&self) -> (f32, f32) {
        (self.solved_x, self.solved_y)
    }

    pub fn edge(&self, dir: usize) -> EdgeDescriptor {
        self.edges[dir]
    }

    pub fn is_border(&self) -> bool {
        self.edges.iter().any(EdgeDescriptor::is_flat)
    }

    pub fn is_corner(&self) -> bool {
        (self.edges[DIR_UP].is_flat() || self.edges[DIR_DOWN].is_flat())
            && (self.edges[DIR_LEFT].is_flat() || self.edges[DIR_RIGHT].is_flat())
    }
}

pub fn validate_grid(
    grid_width: f32,
    grid_height: f32,
    cols: u32,
    rows: u32,
) -> Result<(), LayoutError> {
    if cols == 0 || rows == 0 {
        return Err(LayoutError::EmptyGrid { cols, rows });
    }
    if (cols as usize).saturating_mul(rows as usize) > MAX_PIECES {
        return Err(LayoutError::TooManyPieces { cols, rows });
    }
    let valid = |value: f32| value.is_finite() && value > 0.0;
    if !valid(grid_width) || !valid(grid_height) {
        return Err(LayoutError::InvalidDimensions {
            width: grid_width,
            height: grid_height,
        });
    }
    Ok(())
}

/// Cuts a `grid_width` x `grid_height` picture into `cols` x `rows` pieces
/// whose shapes are fully determined by `seed`.
///
/// Every piece starts at its solved position, unplaced, as its own group.
pub fn generate(
    grid_width: f32,
    grid_height: f32,
    cols: u32,
    rows: u32,
    seed: u32,
) -> Result<Vec<PieceRecord>, LayoutError> {
    let mut rng = ShapeRng::new(seed);
    generate_with_rng(grid_width, grid_height, cols, rows, &mut rng)
}

pub fn generate_with_rng<R: RngCore + ?Sized>(
    grid_width: f32,
    grid_height: f32,
    cols: u32,
    rows: u32,
    rng: &mut R,
) -> Result<Vec<PieceRecord>, LayoutError> {
    validate_grid(grid_width, grid_height, cols, rows)?;
    let edges = EdgeGrid::generate(cols as usize, rows as usize, rng);
    Ok(build_pieces(&edges, grid_width, grid_height))
}

pub fn build_pieces(edges: &EdgeGrid, grid_width: f32, grid_height: f32) -> Vec<PieceRecord> {
    let cols = edges.cols();
    let rows = edges.rows();
    let piece_width = grid_width / cols as f32;
    let piece_height = grid_height / rows as f32;
    let mut pieces = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let id = row * cols + col;
            let solved_x = col as f32 * piece_width;
            let solved_y = row as f32 * piece_height;
            pieces.push(PieceRecord {
                id,
                col: col as u32,
                row: row as u32,
                edges: edges.piece_edges(row, col),
                solved_x,
                solved_y,
                width: piece_width,
                height: piece_height,
                x: solved_x,
                y: solved_y,
                is_placed: false,
                group_id: id,
                z_index: id as u32,
                in_tray: false,
            });
        }
    }
    pieces
}
