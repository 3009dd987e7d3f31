//! Piece geometry and grouping engine for a jigsaw puzzle.
//!
//! [`layout::generate`] cuts a grid into pieces whose shared edges interlock
//! exactly, [`outline::build_outline`] turns a piece into a closed shape for
//! hit-testing and clipping, and [`Board`] tracks positions, groups and locks
//! as pieces are dragged and released.

pub mod board;
pub mod codec;
pub mod edge;
pub mod error;
pub mod game;
pub mod grid;
pub mod groups;
pub mod layout;
pub mod outline;
pub mod snap;
pub mod snapshot;

pub use board::{Board, GameRules, Workspace};
pub use codec::{decode, decode_snapshot, encode, encode_snapshot};
pub use edge::{EdgeDescriptor, EdgeGrid, EdgeType};
pub use error::{CodecError, LayoutError, RestoreError};
pub use game::ShapeRng;
pub use grid::{grid_for_count, GridChoice, PIECE_ASPECT_MAX};
pub use groups::GroupEngine;
pub use layout::{generate, generate_with_rng, PieceId, PieceRecord};
pub use outline::{build_outline, Outline};
pub use snap::{DropOutcome, MergePolicy, SnapKind};
pub use snapshot::{GameSnapshot, PieceSnapshot, PuzzleInfo, GAME_SNAPSHOT_VERSION};
