use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::game::{
    range, unit, ShapeRng, KNOB_SCALE_DEFAULT, KNOB_SCALE_MAX, KNOB_SCALE_MIN,
    SNAP_RATIO_DEFAULT, SNAP_RATIO_MAX, SNAP_RATIO_MIN,
};
use crate::groups::GroupEngine;
use crate::layout::{generate, PieceId, PieceRecord};
use crate::outline::{build_outline, Outline};

pub const WORKSPACE_PADDING_RATIO_DEFAULT: f32 = 0.25;
pub const WORKSPACE_PADDING_RATIO_MAX: f32 = 1.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[serde(default)]
pub struct GameRules {
    /// Snap and lock tolerance as a fraction of the piece's smaller side.
    pub snap_distance_ratio: f32,
    /// Knob protrusion as a fraction of the piece's smaller side.
    pub knob_scale: f32,
    /// Margin around the solved frame, per side, as a fraction of its size.
    pub workspace_padding_ratio: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            snap_distance_ratio: SNAP_RATIO_DEFAULT,
            knob_scale: KNOB_SCALE_DEFAULT,
            workspace_padding_ratio: WORKSPACE_PADDING_RATIO_DEFAULT,
        }
    }
}

impl GameRules {
    pub fn sanitized(self) -> Self {
        let or_default = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        Self {
            snap_distance_ratio: or_default(self.snap_distance_ratio, SNAP_RATIO_DEFAULT)
                .clamp(SNAP_RATIO_MIN, SNAP_RATIO_MAX),
            knob_scale: or_default(self.knob_scale, KNOB_SCALE_DEFAULT)
                .clamp(KNOB_SCALE_MIN, KNOB_SCALE_MAX),
            workspace_padding_ratio: or_default(
                self.workspace_padding_ratio,
                WORKSPACE_PADDING_RATIO_DEFAULT,
            )
            .clamp(0.0, WORKSPACE_PADDING_RATIO_MAX),
        }
    }
}

/// Area pieces live in; fractional coordinates are relative to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Workspace {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Workspace {
    pub fn around_frame(frame_width: f32, frame_height: f32, padding_ratio: f32) -> Self {
        let pad_x = frame_width * padding_ratio;
        let pad_y = frame_height * padding_ratio;
        Self {
            min_x: -pad_x,
            min_y: -pad_y,
            width: frame_width + pad_x * 2.0,
            height: frame_height + pad_y * 2.0,
        }
    }

    pub fn to_fraction(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.min_x) / self.width, (y - self.min_y) / self.height)
    }

    pub fn from_fraction(&self, fx: f32, fy: f32) -> (f32, f32) {
        (self.min_x + fx * self.width, self.min_y + fy * self.height)
    }
}

/// Piece set, group structure and paint order of one puzzle session.
///
/// Every mutation goes through `&mut self`, so a group is always translated,
/// merged and lock-checked as one step before any reader sees it.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) seed: u32,
    pub(crate) cols: u32,
    pub(crate) rows: u32,
    pub(crate) grid_width: f32,
    pub(crate) grid_height: f32,
    pub(crate) rules: GameRules,
    pub(crate) workspace: Workspace,
    pub(crate) pieces: Vec<PieceRecord>,
    pub(crate) outlines: Vec<Outline>,
    pub(crate) groups: GroupEngine,
    pub(crate) next_z: u32,
    pub(crate) completed: bool,
}

impl Board {
    pub fn new(
        grid_width: f32,
        grid_height: f32,
        cols: u32,
        rows: u32,
        seed: u32,
        rules: GameRules,
    ) -> Result<Self, LayoutError> {
        let pieces = generate(grid_width, grid_height, cols, rows, seed)?;
        let rules = rules.sanitized();
        let outlines = pieces
            .iter()
            .map(|piece| build_outline(piece, rules.knob_scale))
            .collect();
        let total = pieces.len();
        Ok(Self {
            seed,
            cols,
            rows,
            grid_width,
            grid_height,
            rules,
            workspace: Workspace::around_frame(
                grid_width,
                grid_height,
                rules.workspace_padding_ratio,
            ),
            pieces,
            outlines,
            groups: GroupEngine::new(total),
            next_z: total as u32,
            completed: false,
        })
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn grid_size(&self) -> (f32, f32) {
        (self.grid_width, self.grid_height)
    }

    pub fn rules(&self) -> GameRules {
        self.rules
    }

    pub fn workspace(&self) -> Workspace {
        self.workspace
    }

    pub fn total(&self) -> usize {
        self.pieces.len()
    }

    pub fn pieces(&self) -> &[PieceRecord] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&PieceRecord> {
        self.pieces.get(id)
    }

    pub fn outline(&self, id: PieceId) -> Option<&Outline> {
        self.outlines.get(id)
    }

    pub fn groups(&self) -> &GroupEngine {
        &self.groups
    }

    pub fn piece_size(&self) -> (f32, f32) {
        (
            self.grid_width / self.cols as f32,
            self.grid_height / self.rows as f32,
        )
    }

    /// Distance within which a piece snaps or locks.
    pub fn tolerance(&self) -> f32 {
        let (w, h) = self.piece_size();
        w.min(h) * self.rules.snap_distance_ratio
    }

    pub fn group_of(&self, id: PieceId) -> Option<PieceId> {
        self.groups.contains(id).then(|| self.groups.root(id))
    }

    pub fn members(&self, id: PieceId) -> &[PieceId] {
        if self.groups.contains(id) {
            self.groups.members(id)
        } else {
            &[]
        }
    }

    pub fn is_locked(&self, id: PieceId) -> bool {
        self.groups.contains(id) && self.groups.is_locked(id)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|piece| piece.is_placed).count()
    }

    /// Translates every member of the group containing `id`. Refused for
    /// locked groups, unknown ids and non-finite displacements.
    pub fn move_group(&mut self, id: PieceId, dx: f32, dy: f32) -> bool {
        if !self.groups.contains(id) || self.groups.is_locked(id) {
            return false;
        }
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        self.translate_members(id, dx, dy);
        true
    }

    /// Moves the group containing `id` so that `id` lands on `(x, y)`.
    pub fn place_group(&mut self, id: PieceId, x: f32, y: f32) -> bool {
        let Some(piece) = self.pieces.get(id) else {
            return false;
        };
        let (dx, dy) = (x - piece.x, y - piece.y);
        self.move_group(id, dx, dy)
    }

    pub(crate) fn translate_members(&mut self, id: PieceId, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let root = self.groups.find(id);
        for &member in self.groups.members(root) {
            let piece = &mut self.pieces[member];
            piece.x += dx;
            piece.y += dy;
        }
    }

    /// Locks the group containing `id` if every member sits within tolerance
    /// of its solved position, snapping all of them exactly onto it.
    /// Partially aligned groups are left untouched.
    pub fn lock_if_aligned(&mut self, id: PieceId) -> bool {
        if !self.groups.contains(id) {
            return false;
        }
        let tolerance = self.tolerance();
        let root = self.groups.find(id);
        let aligned = self.groups.members(root).iter().all(|&member| {
            let piece = &self.pieces[member];
            crate::game::distance(piece.position(), piece.solved_position()) <= tolerance
        });
        if !aligned {
            return false;
        }
        for &member in self.groups.members(root) {
            let piece = &mut self.pieces[member];
            piece.x = piece.solved_x;
            piece.y = piece.solved_y;
            piece.is_placed = true;
            piece.in_tray = false;
        }
        self.groups.lock(root);
        true
    }

    /// Merges two groups and refreshes the members' `group_id`.
    pub(crate) fn merge(&mut self, a: PieceId, b: PieceId) -> PieceId {
        let root = self.groups.union(a, b);
        for &member in self.groups.members(root) {
            self.pieces[member].group_id = root;
        }
        root
    }

    /// Starts a drag: raises the whole group above everything else. Returns
    /// the group root, or `None` when the piece is unknown or locked.
    pub fn begin_drag(&mut self, id: PieceId) -> Option<PieceId> {
        if !self.groups.contains(id) || self.groups.is_locked(id) {
            return None;
        }
        let root = self.groups.find(id);
        self.pieces[id].in_tray = false;
        self.raise_group(root);
        Some(root)
    }

    /// Applies one incremental drag displacement to the held group.
    pub fn drag_to(&mut self, id: PieceId, dx: f32, dy: f32) -> bool {
        self.move_group(id, dx, dy)
    }

    fn raise_group(&mut self, root: PieceId) {
        let mut members = self.groups.members(root).to_vec();
        if self.next_z.checked_add(members.len() as u32).is_none() {
            self.compact_paint_order();
        }
        members.sort_by_key(|&member| self.pieces[member].z_index);
        for member in members {
            self.pieces[member].z_index = self.next_z;
            self.next_z += 1;
        }
    }

    /// Renumbers paint order to `0..total`, keeping the current stacking.
    fn compact_paint_order(&mut self) {
        let mut order: Vec<PieceId> = (0..self.pieces.len()).collect();
        order.sort_by_key(|&id| (self.pieces[id].z_index, id));
        for (z, id) in order.into_iter().enumerate() {
            self.pieces[id].z_index = z as u32;
        }
        self.next_z = self.pieces.len() as u32;
    }

    /// Topmost piece whose outline contains the board point `(x, y)`.
    pub fn piece_at(&self, x: f32, y: f32) -> Option<PieceId> {
        self.pieces
            .iter()
            .filter(|piece| {
                self.outlines[piece.id].contains(x - piece.x, y - piece.y)
            })
            .max_by_key(|piece| piece.z_index)
            .map(|piece| piece.id)
    }

    /// Parks a loose piece in the tray or takes it out again. Only
    /// unlocked single pieces can be parked.
    pub fn set_in_tray(&mut self, id: PieceId, in_tray: bool) -> bool {
        if !self.groups.contains(id) || self.groups.is_locked(id) {
            return false;
        }
        if in_tray && self.groups.group_size(id) > 1 {
            return false;
        }
        self.pieces[id].in_tray = in_tray;
        true
    }

    /// Scatters every loose single piece across the workspace and shuffles
    /// paint order, deterministically for `seed`.
    pub fn scramble(&mut self, seed: u32) {
        let mut rng = ShapeRng::new(seed);
        let (piece_width, piece_height) = self.piece_size();
        let area = self.workspace;
        let min_x = area.min_x;
        let min_y = area.min_y;
        let max_x = (area.min_x + area.width - piece_width).max(min_x);
        let max_y = (area.min_y + area.height - piece_height).max(min_y);
        for id in 0..self.pieces.len() {
            let x = range(&mut rng, min_x, max_x);
            let y = range(&mut rng, min_y, max_y);
            if self.groups.is_locked(id) || self.groups.group_size(id) > 1 {
                continue;
            }
            let piece = &mut self.pieces[id];
            piece.x = x;
            piece.y = y;
        }

        let mut order: Vec<PieceId> = (0..self.pieces.len()).collect();
        for i in (1..order.len()).rev() {
            let j = ((unit(&mut rng) * (i as f32 + 1.0)) as usize).min(i);
            order.swap(i, j);
        }
        for (z, id) in order.into_iter().enumerate() {
            self.pieces[id].z_index = z as u32;
        }
        self.next_z = self.pieces.len() as u32;
    }
}
