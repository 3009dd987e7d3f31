use crate::game::MAX_PIECES;

/// Pieces longer than this on one side than the other are only chosen when
/// no grid near the target count keeps them squarer. Snap tolerance follows
/// the shorter side, so long pieces snap less forgivingly.
pub const PIECE_ASPECT_MAX: f32 = 1.5;
/// Weight of piece elongation against relative piece-count error.
const ASPECT_WEIGHT: f32 = 0.5;
/// Rows tried on each side of the ideal row count.
const ROW_SPREAD: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridChoice {
    pub cols: u32,
    pub rows: u32,
}

impl GridChoice {
    pub fn piece_count(&self) -> u32 {
        self.cols * self.rows
    }

    /// Width over height of one piece on a `width` x `height` board.
    pub fn piece_aspect(&self, width: f32, height: f32) -> f32 {
        (width / self.cols as f32) / (height / self.rows as f32)
    }

    fn elongation(&self, width: f32, height: f32) -> f32 {
        self.piece_aspect(width, height).ln().abs()
    }
}

/// Grid for about `target` pieces on a `width` x `height` board, keeping
/// pieces as close to square as the count allows.
///
/// Returns `None` only for unusable input: a zero target or a board that is
/// not finite and positive.
pub fn grid_for_count(width: f32, height: f32, target: u32) -> Option<GridChoice> {
    let valid = |value: f32| value.is_finite() && value > 0.0;
    if target == 0 || !valid(width) || !valid(height) {
        return None;
    }
    let target = target.min(MAX_PIECES as u32);
    let ideal_rows = (target as f32 * height / width).sqrt();
    let lo = (ideal_rows.floor() as u32)
        .saturating_sub(ROW_SPREAD)
        .clamp(1, target);
    let hi = (ideal_rows.ceil() as u32)
        .saturating_add(ROW_SPREAD)
        .clamp(lo, target);
    let aspect_limit = PIECE_ASPECT_MAX.ln();

    // (over the aspect limit, score)
    let mut best: Option<(GridChoice, (bool, f32))> = None;
    for rows in lo..=hi {
        let ideal_cols = target as f32 / rows as f32;
        let mut candidates = [ideal_cols.floor() as u32, ideal_cols.ceil() as u32];
        candidates.iter_mut().for_each(|cols| *cols = (*cols).max(1));
        for cols in candidates {
            let choice = GridChoice { cols, rows };
            if choice.piece_count() as usize > MAX_PIECES {
                continue;
            }
            let count_err =
                (choice.piece_count() as f32 - target as f32).abs() / target as f32;
            let elongation = choice.elongation(width, height);
            let key = (elongation > aspect_limit, count_err + ASPECT_WEIGHT * elongation);
            let better = match &best {
                None => true,
                Some((_, (over, score))) => key.0 < *over || (key.0 == *over && key.1 < *score),
            };
            if better {
                best = Some((choice, key));
            }
        }
    }
    best.map(|(choice, _)| choice)
}
