use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kumitate::{FileStore, MemoryStore, PuzzleSession, Settings, StoreError, LOCAL_GAME_KEY};
use kumitate_core::{Board, DropOutcome, GameRules, PieceId};

fn loose_session(cols: u32, rows: u32) -> PuzzleSession {
    let mut board = Board::new(
        cols as f32 * 100.0,
        rows as f32 * 100.0,
        cols,
        rows,
        42,
        GameRules::default(),
    )
    .expect("board");
    for id in 0..board.total() {
        board.place_group(id, 1000.0 + id as f32 * 300.0, 1000.0);
    }
    PuzzleSession::new(board)
}

/// Drags `piece` so that its top-left corner lands `(dx, dy)` off its solved
/// position, then releases it.
fn drop_near_home(session: &mut PuzzleSession, piece: PieceId, dx: f32, dy: f32) -> DropOutcome {
    assert!(session.begin_drag(piece));
    let (x, y) = session.board().piece(piece).expect("piece").solved_position();
    assert!(session.drag_to(x + dx, y + dy));
    session.end_drag()
}

#[test]
fn press_picks_the_topmost_piece_and_drags_its_group() {
    let mut session = loose_session(2, 1);
    let held = session.press(1050.0, 1050.0);
    assert_eq!(held, Some(0));
    assert!(session.drag_to(1070.0, 1040.0));
    assert_eq!(
        session.board().piece(0).expect("piece").position(),
        (1020.0, 990.0)
    );
    assert_eq!(session.end_drag(), DropOutcome::Floating);
    assert_eq!(session.drag(), None);
    assert_eq!(session.press(-500.0, -500.0), None);
    assert!(!session.drag_to(0.0, 0.0));
}

#[test]
fn locked_pieces_cannot_be_picked_up() {
    let mut session = loose_session(2, 1);
    assert!(drop_near_home(&mut session, 0, 4.0, 4.0).snapped());
    assert_eq!(session.press(50.0, 50.0), None);
    assert!(!session.begin_drag(0));
    assert_eq!(session.end_drag(), DropOutcome::Ignored);
}

#[test]
fn completion_is_announced_once() {
    let mut session = loose_session(3, 2);
    let completions = Rc::new(Cell::new(0));
    let snaps = Rc::new(RefCell::new(Vec::new()));
    {
        let completions = Rc::clone(&completions);
        session.on_complete(move |board| {
            assert!(board.is_complete());
            completions.set(completions.get() + 1);
        });
        let snaps = Rc::clone(&snaps);
        session.on_snap(move |piece, outcome| {
            snaps.borrow_mut().push((piece, outcome.completed()));
        });
    }

    for piece in 0..6 {
        assert!(drop_near_home(&mut session, piece, -3.0, 2.0).snapped());
    }
    assert_eq!(completions.get(), 1);
    let snaps = snaps.borrow();
    assert_eq!(snaps.len(), 6);
    assert_eq!(snaps.iter().filter(|(_, done)| *done).count(), 1);
    assert_eq!(snaps.last(), Some(&(5, true)));

    // nothing is left to drag, so nothing fires again
    assert_eq!(session.press(150.0, 50.0), None);
    assert_eq!(completions.get(), 1);
}

#[test]
fn snapshot_survives_a_memory_store() {
    let mut session = loose_session(3, 3);
    assert!(drop_near_home(&mut session, 4, 2.0, 2.0).snapped());
    assert!(session.begin_drag(0));
    assert!(session.drag_to(500.0, 500.0));
    session.end_drag();

    let mut store = MemoryStore::new();
    session.save(&mut store, LOCAL_GAME_KEY).expect("save");
    assert!(store.raw(LOCAL_GAME_KEY).is_some_and(|text| !text.is_empty()));

    let mut other = loose_session(3, 3);
    assert!(other.load(&store, LOCAL_GAME_KEY).expect("load"));
    assert_eq!(
        other.board().groups().partition(),
        session.board().groups().partition()
    );
    assert!(other.board().is_locked(4));
    let (x, y) = other.board().piece(0).expect("piece").position();
    assert!((x - 500.0).abs() < 1e-2 && (y - 500.0).abs() < 1e-2);

    assert!(!other.load(&store, "missing").expect("load"));
}

#[test]
fn load_rejects_another_puzzle() {
    let session = loose_session(3, 3);
    let mut store = MemoryStore::new();
    session.save(&mut store, LOCAL_GAME_KEY).expect("save");

    let mut other = loose_session(2, 2);
    let before = other.board().pieces().to_vec();
    assert!(matches!(
        other.load(&store, LOCAL_GAME_KEY),
        Err(StoreError::Mismatch { .. })
    ));
    assert_eq!(other.board().pieces(), before.as_slice());
}

#[test]
fn corrupt_payloads_are_errors() {
    let mut session = loose_session(2, 2);
    let mut store = MemoryStore::new();
    store.set_raw(LOCAL_GAME_KEY, "@@@");
    assert!(matches!(
        session.load(&store, LOCAL_GAME_KEY),
        Err(StoreError::Base64 { .. })
    ));
    store.set_raw(LOCAL_GAME_KEY, "AAAA");
    assert!(matches!(
        session.load(&store, LOCAL_GAME_KEY),
        Err(StoreError::Codec(_))
    ));
}

#[test]
fn file_store_resumes_a_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FileStore::open(dir.path()).expect("store");

    let settings = Settings::default();
    let mut session = PuzzleSession::start(&settings, 7).expect("start");
    assert!(drop_near_home(&mut session, 0, 1.0, 1.0).snapped());
    session.save(&mut store, "saved-game").expect("save");

    let resumed = PuzzleSession::resume(&store, "saved-game", 800.0, 600.0)
        .expect("resume")
        .expect("stored session");
    assert_eq!(resumed.board().puzzle_info(), session.board().puzzle_info());
    assert!(resumed.board().is_locked(0));
    assert_eq!(resumed.board().total(), 48);

    assert!(PuzzleSession::resume(&store, "other", 800.0, 600.0)
        .expect("resume")
        .is_none());
}
