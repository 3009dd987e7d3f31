/// Rejected generation parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("grid needs at least one column and one row, got {cols}x{rows}")]
    EmptyGrid { cols: u32, rows: u32 },

    #[error("grid of {cols}x{rows} pieces exceeds the supported piece count")]
    TooManyPieces { cols: u32, rows: u32 },

    #[error("board dimensions must be finite and positive, got {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
}

/// Saved state that does not fit the freshly generated layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RestoreError {
    #[error("snapshot version {found} is not supported (expected {expected})")]
    Version { expected: u32, found: u32 },

    #[error("failed to regenerate layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("snapshot holds {found} pieces, layout has {expected}")]
    PieceCount { expected: usize, found: usize },

    #[error("snapshot references piece {id}, layout has {total} pieces")]
    UnknownPiece { id: u32, total: usize },

    #[error("piece {piece} references group {group}, layout has {total} pieces")]
    UnknownGroup { piece: u32, group: u32, total: usize },

    #[error("locked group {group} has no members in the snapshot")]
    UnknownLockedGroup { group: u32 },

    #[error("piece {id} appears more than once in the snapshot")]
    DuplicatePiece { id: u32 },

    #[error("piece {id} has a non-finite saved position")]
    InvalidPosition { id: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] rkyv::rancor::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] rkyv::rancor::Error),
}
