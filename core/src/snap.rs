use crate::board::Board;
use crate::game::{distance, neighbor_id, neighbor_offset, DIRS};
use crate::layout::PieceId;

/// How two groups join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// The held group moves into the stationary group's frame.
    MoveDragged,
    /// Both groups are locked and already consistent; join identities only.
    IdentityOnly,
}

impl MergePolicy {
    /// `None` when only the held side is locked: a locked group never moves,
    /// and a loose group is never pulled onto it.
    pub fn decide(dragged_locked: bool, stationary_locked: bool) -> Option<Self> {
        match (dragged_locked, stationary_locked) {
            (true, true) => Some(MergePolicy::IdentityOnly),
            (true, false) => None,
            (false, _) => Some(MergePolicy::MoveDragged),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapKind {
    /// Joined the group of the neighbor in direction `dir`.
    Neighbor { neighbor: PieceId, dir: usize },
    /// Moved onto its own solved position.
    Solved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Unknown piece or a locked group; nothing changed.
    Ignored,
    /// No snap opportunity; the group stays where it was released.
    Floating,
    Snapped {
        kind: SnapKind,
        root: PieceId,
        locked: bool,
        /// Set on the one drop that finished the puzzle.
        completed: bool,
    },
}

impl DropOutcome {
    pub fn snapped(&self) -> bool {
        matches!(self, DropOutcome::Snapped { .. })
    }

    pub fn root(&self) -> Option<PieceId> {
        match self {
            DropOutcome::Snapped { root, .. } => Some(*root),
            _ => None,
        }
    }

    pub fn completed(&self) -> bool {
        matches!(self, DropOutcome::Snapped { completed: true, .. })
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    neighbor: PieceId,
    dir: usize,
    expected: (f32, f32),
    dist: f32,
}

impl Board {
    /// Snap evaluation for the piece that was just released.
    ///
    /// Tries a neighbor snap first, then a solved-position snap. After either,
    /// the resulting group is lock-checked and, once locked, joined with every
    /// locked group it borders.
    pub fn end_drag(&mut self, id: PieceId) -> DropOutcome {
        if !self.groups.contains(id) || self.groups.is_locked(id) {
            return DropOutcome::Ignored;
        }

        let kind = if let Some(candidate) = self.best_neighbor(id) {
            self.join_groups(id, candidate.neighbor, candidate.expected);
            SnapKind::Neighbor {
                neighbor: candidate.neighbor,
                dir: candidate.dir,
            }
        } else if self.solved_within_tolerance(id) {
            let piece = &self.pieces[id];
            let (dx, dy) = (piece.solved_x - piece.x, piece.solved_y - piece.y);
            self.translate_members(id, dx, dy);
            SnapKind::Solved
        } else {
            return DropOutcome::Floating;
        };

        let locked = self.lock_if_aligned(id);
        if locked {
            self.join_locked_neighbors(id);
        }
        let root = self.groups.find(id);
        let completed = self.check_completion(root);
        DropOutcome::Snapped {
            kind,
            root,
            locked,
            completed,
        }
    }

    /// Closest grid neighbor on the board, outside the held group, whose
    /// attachment point is within tolerance of the held piece.
    fn best_neighbor(&self, id: PieceId) -> Option<Candidate> {
        let cols = self.cols as usize;
        let rows = self.rows as usize;
        let tolerance = self.tolerance();
        let (piece_width, piece_height) = self.piece_size();
        let held = &self.pieces[id];
        let mut best: Option<Candidate> = None;
        for dir in DIRS {
            let Some(neighbor) = neighbor_id(id, cols, rows, dir) else {
                continue;
            };
            let other = &self.pieces[neighbor];
            if other.in_tray || self.groups.same_group(id, neighbor) {
                continue;
            }
            // held piece sits opposite to the neighbor's offset from it
            let (ox, oy) = neighbor_offset(dir, piece_width, piece_height);
            let expected = (other.x - ox, other.y - oy);
            let dist = distance(held.position(), expected);
            if dist > tolerance {
                continue;
            }
            if best.is_some_and(|current| dist >= current.dist) {
                continue;
            }
            best = Some(Candidate {
                neighbor,
                dir,
                expected,
                dist,
            });
        }
        best
    }

    /// Joins the group of `id` with the group of `other`, where `expected` is
    /// the position `id` takes when attached to `other`. Returns false when
    /// the policy refuses the merge.
    fn join_groups(&mut self, id: PieceId, other: PieceId, expected: (f32, f32)) -> bool {
        let policy = MergePolicy::decide(self.groups.is_locked(id), self.groups.is_locked(other));
        match policy {
            Some(MergePolicy::MoveDragged) => {
                let held = self.pieces[id].position();
                self.translate_members(id, expected.0 - held.0, expected.1 - held.1);
            }
            Some(MergePolicy::IdentityOnly) => {}
            None => return false,
        }
        self.merge(id, other);
        true
    }

    fn solved_within_tolerance(&self, id: PieceId) -> bool {
        let piece = &self.pieces[id];
        distance(piece.position(), piece.solved_position()) <= self.tolerance()
    }

    /// Joins every locked group that borders the (locked) group of `id`.
    /// Both sides already sit in the solved frame, so nothing moves.
    fn join_locked_neighbors(&mut self, id: PieceId) {
        let cols = self.cols as usize;
        let rows = self.rows as usize;
        let mut pending = self.groups.members(id).to_vec();
        while let Some(member) = pending.pop() {
            for dir in DIRS {
                let Some(neighbor) = neighbor_id(member, cols, rows, dir) else {
                    continue;
                };
                if self.groups.same_group(member, neighbor) || !self.groups.is_locked(neighbor) {
                    continue;
                }
                let joining = self.groups.members(neighbor).to_vec();
                let expected = self.pieces[member].solved_position();
                if self.join_groups(member, neighbor, expected) {
                    pending.extend(joining);
                }
            }
        }
    }

    fn check_completion(&mut self, root: PieceId) -> bool {
        if self.completed {
            return false;
        }
        let done = self.groups.group_size(root) == self.pieces.len() && self.groups.is_locked(root);
        if done {
            self.completed = true;
        }
        done
    }
}
