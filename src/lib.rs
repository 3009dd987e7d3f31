//! Session layer over [`kumitate_core`]: pointer gestures, completion and
//! snap subscribers, settings files and snapshot stores.

pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use config::{PuzzleSettings, Settings};
pub use error::{ConfigError, StoreError};
pub use session::{DragState, PuzzleSession};
pub use store::{FileStore, MemoryStore, SnapshotStore, LOCAL_GAME_KEY};
