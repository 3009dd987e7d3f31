use rkyv::{Archive, Deserialize, Serialize};

use crate::board::{Board, GameRules};
use crate::error::RestoreError;
use crate::layout::PieceId;

pub const GAME_SNAPSHOT_VERSION: u32 = 2;

/// Everything needed to regenerate identical piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
pub struct PuzzleInfo {
    pub seed: u32,
    pub cols: u32,
    pub rows: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: u32,
    /// Position relative to the workspace, so a layout survives a resize.
    pub fx: f32,
    pub fy: f32,
    pub is_placed: bool,
    pub group_id: u32,
    pub z_index: u32,
    pub in_tray: bool,
}

/// Read-only projection of a board. Geometry is never stored; it is
/// regenerated from `puzzle`.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub rules: GameRules,
    pub puzzle: PuzzleInfo,
    pub pieces: Vec<PieceSnapshot>,
    pub locked_groups: Vec<u32>,
    pub completed: bool,
}

impl GameSnapshot {
    pub fn group_count(&self) -> usize {
        let mut ids: Vec<u32> = self.pieces.iter().map(|piece| piece.group_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

impl Board {
    pub fn puzzle_info(&self) -> PuzzleInfo {
        PuzzleInfo {
            seed: self.seed,
            cols: self.cols,
            rows: self.rows,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let workspace = self.workspace;
        let pieces = self
            .pieces
            .iter()
            .map(|piece| {
                let (fx, fy) = workspace.to_fraction(piece.x, piece.y);
                PieceSnapshot {
                    id: piece.id as u32,
                    fx,
                    fy,
                    is_placed: piece.is_placed,
                    group_id: self.groups.root(piece.id) as u32,
                    z_index: piece.z_index,
                    in_tray: piece.in_tray,
                }
            })
            .collect();
        let locked_groups = self
            .groups
            .roots()
            .filter(|root| self.groups.is_locked(*root))
            .map(|root| root as u32)
            .collect();
        GameSnapshot {
            version: GAME_SNAPSHOT_VERSION,
            rules: self.rules,
            puzzle: self.puzzle_info(),
            pieces,
            locked_groups,
            completed: self.completed,
        }
    }

    /// Regenerates the layout from the saved seed and grid, then reapplies
    /// positions, paint order, tray flags, group membership and locks.
    ///
    /// Groups are rebuilt by joining pieces that share a saved group id, not
    /// by replaying snaps. Anything that does not fit the regenerated layout
    /// is reported instead of being dropped.
    pub fn restore(
        grid_width: f32,
        grid_height: f32,
        snapshot: &GameSnapshot,
    ) -> Result<Board, RestoreError> {
        Self::restore_as(grid_width, grid_height, snapshot.puzzle, snapshot)
    }

    /// Like [`Board::restore`], but regenerates from the seed and grid the
    /// caller supplies rather than the ones recorded in the snapshot.
    pub fn restore_as(
        grid_width: f32,
        grid_height: f32,
        info: PuzzleInfo,
        snapshot: &GameSnapshot,
    ) -> Result<Board, RestoreError> {
        if snapshot.version != GAME_SNAPSHOT_VERSION {
            return Err(RestoreError::Version {
                expected: GAME_SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        let mut board = Board::new(
            grid_width,
            grid_height,
            info.cols,
            info.rows,
            info.seed,
            snapshot.rules,
        )?;
        let total = board.total();
        if snapshot.pieces.len() != total {
            return Err(RestoreError::PieceCount {
                expected: total,
                found: snapshot.pieces.len(),
            });
        }

        let mut seen = vec![false; total];
        let mut anchor_of_group: Vec<Option<PieceId>> = vec![None; total];
        let mut max_z = 0u32;
        for saved in &snapshot.pieces {
            let id = saved.id as usize;
            if id >= total {
                return Err(RestoreError::UnknownPiece {
                    id: saved.id,
                    total,
                });
            }
            if std::mem::replace(&mut seen[id], true) {
                return Err(RestoreError::DuplicatePiece { id: saved.id });
            }
            let group = saved.group_id as usize;
            if group >= total {
                return Err(RestoreError::UnknownGroup {
                    piece: saved.id,
                    group: saved.group_id,
                    total,
                });
            }
            if !saved.fx.is_finite() || !saved.fy.is_finite() {
                return Err(RestoreError::InvalidPosition { id: saved.id });
            }
            let (x, y) = board.workspace.from_fraction(saved.fx, saved.fy);
            let piece = &mut board.pieces[id];
            piece.x = x;
            piece.y = y;
            piece.is_placed = saved.is_placed;
            piece.z_index = saved.z_index;
            piece.in_tray = saved.in_tray;
            max_z = max_z.max(saved.z_index);

            match anchor_of_group[group] {
                Some(anchor) => {
                    board.merge(anchor, id);
                }
                None => anchor_of_group[group] = Some(id),
            }
        }

        for &group in &snapshot.locked_groups {
            let Some(anchor) = anchor_of_group.get(group as usize).copied().flatten() else {
                return Err(RestoreError::UnknownLockedGroup { group });
            };
            let root = board.groups.find(anchor);
            for &member in board.groups.members(root) {
                let piece = &mut board.pieces[member];
                piece.x = piece.solved_x;
                piece.y = piece.solved_y;
                piece.is_placed = true;
            }
            board.groups.lock(root);
        }

        // only loose single pieces can sit in the tray
        for id in 0..total {
            if board.groups.is_locked(id) || board.groups.group_size(id) > 1 {
                board.pieces[id].in_tray = false;
            }
        }

        board.next_z = max_z.saturating_add(1);
        board.completed = snapshot.completed;
        Ok(board)
    }
}
