use kumitate_core::{Board, DropOutcome, LayoutError, PieceId, SnapKind};

use crate::config::Settings;
use crate::error::StoreError;
use crate::store::{load_snapshot, save_snapshot, SnapshotStore};

type CompleteHandler = Box<dyn FnMut(&Board)>;
type SnapHandler = Box<dyn FnMut(PieceId, &DropOutcome)>;

/// The piece being held and the last pointer position seen for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub piece: PieceId,
    pub root: PieceId,
    pub cursor_x: f32,
    pub cursor_y: f32,
}

/// A board plus the gesture in progress and the parties listening to it.
pub struct PuzzleSession {
    board: Board,
    drag: Option<DragState>,
    on_complete: Vec<CompleteHandler>,
    on_snap: Vec<SnapHandler>,
}

impl std::fmt::Debug for PuzzleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleSession")
            .field("board", &self.board)
            .field("drag", &self.drag)
            .field("on_complete", &self.on_complete.len())
            .field("on_snap", &self.on_snap.len())
            .finish()
    }
}

impl PuzzleSession {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            drag: None,
            on_complete: Vec::new(),
            on_snap: Vec::new(),
        }
    }

    /// Cuts the configured puzzle and scatters it across the workspace.
    pub fn start(settings: &Settings, seed: u32) -> Result<Self, LayoutError> {
        let mut board = settings.build_board(seed)?;
        board.scramble(seed);
        tracing::info!(
            seed,
            cols = board.cols(),
            rows = board.rows(),
            "puzzle started"
        );
        Ok(Self::new(board))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Called once, on the drop that completes the puzzle.
    pub fn on_complete(&mut self, handler: impl FnMut(&Board) + 'static) {
        self.on_complete.push(Box::new(handler));
    }

    /// Called after every drop that snapped, with the held piece.
    pub fn on_snap(&mut self, handler: impl FnMut(PieceId, &DropOutcome) + 'static) {
        self.on_snap.push(Box::new(handler));
    }

    /// Pointer down at board point `(x, y)`: picks the topmost piece there
    /// and starts dragging its group.
    pub fn press(&mut self, x: f32, y: f32) -> Option<PieceId> {
        let piece = self.board.piece_at(x, y)?;
        self.start_drag(piece, x, y).then_some(piece)
    }

    /// Starts dragging `piece` without a pointer; the cursor is anchored at
    /// the piece's top-left corner.
    pub fn begin_drag(&mut self, piece: PieceId) -> bool {
        let Some((x, y)) = self.board.piece(piece).map(|p| p.position()) else {
            tracing::debug!(piece, "drag refused: unknown piece");
            return false;
        };
        self.start_drag(piece, x, y)
    }

    fn start_drag(&mut self, piece: PieceId, x: f32, y: f32) -> bool {
        if self.drag.is_some() {
            self.end_drag();
        }
        let Some(root) = self.board.begin_drag(piece) else {
            tracing::debug!(piece, "drag refused: group is locked");
            return false;
        };
        self.drag = Some(DragState {
            piece,
            root,
            cursor_x: x,
            cursor_y: y,
        });
        true
    }

    /// Pointer moved to `(x, y)`; the held group follows by the same delta.
    pub fn drag_to(&mut self, x: f32, y: f32) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let (dx, dy) = (x - drag.cursor_x, y - drag.cursor_y);
        if !self.board.drag_to(drag.piece, dx, dy) {
            return false;
        }
        drag.cursor_x = x;
        drag.cursor_y = y;
        true
    }

    /// Releases the held piece and runs snap evaluation.
    pub fn end_drag(&mut self) -> DropOutcome {
        let Some(drag) = self.drag.take() else {
            return DropOutcome::Ignored;
        };
        let outcome = self.board.end_drag(drag.piece);
        match outcome {
            DropOutcome::Snapped {
                kind,
                root,
                locked,
                completed,
            } => {
                match kind {
                    SnapKind::Neighbor { neighbor, dir } => {
                        tracing::debug!(
                            piece = drag.piece,
                            neighbor,
                            dir,
                            root,
                            locked,
                            "snapped to neighbor"
                        );
                    }
                    SnapKind::Solved => {
                        tracing::debug!(
                            piece = drag.piece,
                            root,
                            locked,
                            "snapped to solved position"
                        );
                    }
                }
                for handler in &mut self.on_snap {
                    handler(drag.piece, &outcome);
                }
                if completed {
                    tracing::info!(pieces = self.board.total(), "puzzle completed");
                    for handler in &mut self.on_complete {
                        handler(&self.board);
                    }
                }
            }
            DropOutcome::Floating => {
                tracing::trace!(piece = drag.piece, "dropped without a snap");
            }
            DropOutcome::Ignored => {}
        }
        outcome
    }

    /// Drops the held piece where it is, without snap evaluation.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn scramble(&mut self, seed: u32) {
        self.drag = None;
        self.board.scramble(seed);
    }

    pub fn save<S>(&self, store: &mut S, key: &str) -> Result<(), StoreError>
    where
        S: SnapshotStore + ?Sized,
    {
        save_snapshot(store, key, &self.board.snapshot())
    }

    /// Replaces the board with the snapshot stored under `key`. The snapshot
    /// must describe the same puzzle. Returns `false` when nothing is stored.
    pub fn load<S>(&mut self, store: &S, key: &str) -> Result<bool, StoreError>
    where
        S: SnapshotStore + ?Sized,
    {
        let Some(snapshot) = load_snapshot(store, key)? else {
            return Ok(false);
        };
        let expected = self.board.puzzle_info();
        if snapshot.puzzle != expected {
            tracing::warn!(key, ?expected, found = ?snapshot.puzzle, "snapshot mismatch");
            return Err(StoreError::Mismatch {
                expected,
                found: snapshot.puzzle,
            });
        }
        let (width, height) = self.board.grid_size();
        let board = Board::restore(width, height, &snapshot).inspect_err(|err| {
            tracing::warn!(key, %err, "snapshot restore failed");
        })?;
        tracing::info!(key, groups = board.groups().group_count(), "snapshot restored");
        self.board = board;
        self.drag = None;
        Ok(true)
    }

    /// Session for whatever puzzle is stored under `key`, laid out on a
    /// `width` x `height` board.
    pub fn resume<S>(
        store: &S,
        key: &str,
        width: f32,
        height: f32,
    ) -> Result<Option<Self>, StoreError>
    where
        S: SnapshotStore + ?Sized,
    {
        let Some(snapshot) = load_snapshot(store, key)? else {
            return Ok(None);
        };
        let board = Board::restore(width, height, &snapshot)?;
        tracing::info!(
            key,
            seed = snapshot.puzzle.seed,
            groups = board.groups().group_count(),
            "session resumed"
        );
        Ok(Some(Self::new(board)))
    }
}
