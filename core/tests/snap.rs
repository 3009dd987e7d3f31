use kumitate_core::game::{DIR_LEFT, DIR_RIGHT};
use kumitate_core::outline::knob_height;
use kumitate_core::{Board, DropOutcome, EdgeType, GameRules, MergePolicy, SnapKind};

const PIECE: f32 = 100.0;

fn board(cols: u32, rows: u32) -> Board {
    Board::new(
        cols as f32 * PIECE,
        rows as f32 * PIECE,
        cols,
        rows,
        42,
        GameRules::default(),
    )
    .expect("board")
}

/// Board with every piece parked far from its solved spot and from its
/// neighbors.
fn loose_board(cols: u32, rows: u32) -> Board {
    let mut board = board(cols, rows);
    for id in 0..board.total() {
        assert!(board.place_group(id, 1000.0 + id as f32 * 300.0, 1000.0));
    }
    board
}

fn position(board: &Board, id: usize) -> (f32, f32) {
    board.piece(id).expect("piece").position()
}

#[test]
fn neighbor_snap_aligns_and_merges() {
    let mut board = loose_board(2, 1);
    board.place_group(0, 300.0, 300.0);
    board.place_group(1, 405.0, 303.0);

    let outcome = board.end_drag(1);
    assert_eq!(
        outcome,
        DropOutcome::Snapped {
            kind: SnapKind::Neighbor {
                neighbor: 0,
                dir: DIR_LEFT
            },
            root: board.group_of(0).expect("group"),
            locked: false,
            completed: false,
        }
    );
    assert_eq!(position(&board, 0), (300.0, 300.0));
    assert_eq!(position(&board, 1), (400.0, 300.0));
    assert_eq!(board.group_of(0), board.group_of(1));
    assert_eq!(board.members(1).len(), 2);
    assert_eq!(
        board.piece(0).map(|p| p.group_id),
        board.piece(1).map(|p| p.group_id)
    );

    // the pair now moves as one
    assert!(board.move_group(0, 10.0, -5.0));
    assert_eq!(position(&board, 0), (310.0, 295.0));
    assert_eq!(position(&board, 1), (410.0, 295.0));
}

#[test]
fn neighbor_snap_on_a_fresh_board_locks_the_pair() {
    let mut board = board(2, 1);
    board.place_group(1, 110.0, 4.0);
    let outcome = board.end_drag(1);
    assert!(matches!(
        outcome,
        DropOutcome::Snapped {
            kind: SnapKind::Neighbor { neighbor: 0, dir: DIR_LEFT },
            locked: true,
            completed: true,
            ..
        }
    ));
    assert_eq!(board.group_of(0), board.group_of(1));
    assert_eq!(position(&board, 1), (100.0, 0.0));
}

#[test]
fn snap_tolerance_is_inclusive_and_tight() {
    let tolerance = board(2, 1).tolerance();
    assert!((tolerance - 22.0).abs() < 1e-4);

    let mut inside = loose_board(2, 1);
    inside.place_group(0, 300.0, 300.0);
    inside.place_group(1, 400.0 + tolerance - 0.01, 300.0);
    assert!(inside.end_drag(1).snapped());

    let mut outside = loose_board(2, 1);
    outside.place_group(0, 300.0, 300.0);
    outside.place_group(1, 400.0 + tolerance + 0.01, 300.0);
    assert_eq!(outside.end_drag(1), DropOutcome::Floating);
    assert_ne!(outside.group_of(0), outside.group_of(1));
}

#[test]
fn closest_neighbor_wins() {
    let mut board = loose_board(3, 1);
    board.place_group(0, 300.0, 300.0);
    board.place_group(2, 500.0, 310.0);
    board.place_group(1, 402.0, 300.0);

    let outcome = board.end_drag(1);
    assert_eq!(
        outcome,
        DropOutcome::Snapped {
            kind: SnapKind::Neighbor {
                neighbor: 0,
                dir: DIR_LEFT
            },
            root: board.group_of(1).expect("group"),
            locked: false,
            completed: false,
        }
    );
    assert_eq!(position(&board, 1), (400.0, 300.0));
    assert_ne!(board.group_of(1), board.group_of(2));
}

#[test]
fn solved_snap_locks_for_good() {
    let mut board = loose_board(2, 1);
    board.place_group(0, 5.0, 5.0);

    let outcome = board.end_drag(0);
    assert!(matches!(
        outcome,
        DropOutcome::Snapped {
            kind: SnapKind::Solved,
            locked: true,
            completed: false,
            ..
        }
    ));
    assert_eq!(position(&board, 0), (0.0, 0.0));
    assert!(board.is_locked(0));
    assert!(board.piece(0).is_some_and(|p| p.is_placed));
    assert_eq!(board.placed_count(), 1);

    assert!(!board.move_group(0, 10.0, 10.0));
    assert_eq!(board.begin_drag(0), None);
    assert_eq!(board.end_drag(0), DropOutcome::Ignored);
    assert_eq!(position(&board, 0), (0.0, 0.0));
}

#[test]
fn group_just_outside_tolerance_stays_loose() {
    let mut board = loose_board(3, 1);
    board.place_group(0, 300.0, 300.0);
    board.place_group(1, 400.0, 300.0);
    assert!(board.end_drag(1).snapped());

    board.place_group(0, 23.0, 0.0);
    assert!(!board.lock_if_aligned(0));
    assert!(!board.is_locked(1));
    assert_eq!(position(&board, 1), (123.0, 0.0));
}

#[test]
fn resnapping_changes_nothing() {
    let mut board = loose_board(2, 1);
    board.place_group(0, 300.0, 300.0);
    board.place_group(1, 401.0, 301.0);
    assert!(board.end_drag(1).snapped());
    let before = board.pieces().to_vec();

    assert_eq!(board.end_drag(1), DropOutcome::Floating);
    assert_eq!(board.end_drag(0), DropOutcome::Floating);
    assert_eq!(board.pieces(), before.as_slice());
    assert_eq!(board.groups().group_count(), 1);
}

#[test]
fn bridging_locked_groups_moves_nothing() {
    let mut board = loose_board(3, 1);
    board.place_group(0, 0.0, 0.0);
    assert!(board.end_drag(0).snapped());
    board.place_group(2, 200.0, 0.0);
    assert!(board.end_drag(2).snapped());
    assert!(board.is_locked(0) && board.is_locked(2));
    assert_ne!(board.group_of(0), board.group_of(2));

    board.place_group(1, 104.0, 3.0);
    let outcome = board.end_drag(1);
    assert!(matches!(
        outcome,
        DropOutcome::Snapped {
            kind: SnapKind::Neighbor { neighbor: 2, dir: DIR_RIGHT },
            locked: true,
            completed: true,
            ..
        }
    ));
    assert_eq!(position(&board, 0), (0.0, 0.0));
    assert_eq!(position(&board, 1), (100.0, 0.0));
    assert_eq!(position(&board, 2), (200.0, 0.0));
    assert_eq!(board.groups().group_count(), 1);
    assert!(board.is_complete());
}

#[test]
fn completion_fires_once() {
    let mut board = loose_board(3, 3);
    let mut completions = 0;
    for id in 0..board.total() {
        let (x, y) = board.piece(id).expect("piece").solved_position();
        board.place_group(id, x + 3.0, y - 2.0);
        let outcome = board.end_drag(id);
        assert!(outcome.snapped(), "piece {id} did not snap");
        if outcome.completed() {
            completions += 1;
            assert_eq!(id, board.total() - 1);
        }
    }
    assert_eq!(completions, 1);
    assert!(board.is_complete());
    assert_eq!(board.placed_count(), 9);
    assert_eq!(board.groups().group_count(), 1);
    for id in 0..board.total() {
        assert_eq!(board.end_drag(id), DropOutcome::Ignored);
    }
}

#[test]
fn drag_raises_whole_group() {
    let mut board = loose_board(2, 2);
    board.place_group(0, 300.0, 300.0);
    board.place_group(1, 400.0, 300.0);
    assert!(board.end_drag(1).snapped());

    let root = board.begin_drag(1).expect("loose group");
    assert_eq!(board.group_of(0), Some(root));
    let z = |board: &Board, id: usize| board.piece(id).expect("piece").z_index;
    for other in [2, 3] {
        assert!(z(&board, 0) > z(&board, other));
        assert!(z(&board, 1) > z(&board, other));
    }
    // relative order inside the group is kept
    assert!(z(&board, 0) < z(&board, 1));

    assert!(board.drag_to(0, 25.0, 0.0));
    assert_eq!(position(&board, 1), (425.0, 300.0));
    assert_eq!(board.begin_drag(3), Some(3));
    assert!(z(&board, 3) > z(&board, 1));
}

#[test]
fn knob_is_picked_by_its_owner() {
    let board = board(2, 1);
    let left = board.piece(0).expect("piece");
    let edge = left.edge(DIR_RIGHT);
    let depth = 0.5 * knob_height(PIECE, PIECE, GameRules::default().knob_scale, edge.size);
    // a point halfway up the knob, measured from the shared line
    let (owner, point) = match edge.kind {
        EdgeType::Tab => {
            let u = edge.offset - 0.75 * edge.tilt;
            (0, (PIECE + depth, u * PIECE))
        }
        EdgeType::Blank => {
            let mate = board.piece(1).expect("piece").edge(DIR_LEFT);
            let u = mate.offset - 0.75 * mate.tilt;
            (1, (PIECE - depth, PIECE - u * PIECE))
        }
        EdgeType::Flat => unreachable!("interior edges are never flat"),
    };
    assert_eq!(board.piece_at(point.0, point.1), Some(owner));
    assert_eq!(board.piece_at(50.0, 5.0), Some(0));
    assert_eq!(board.piece_at(150.0, 95.0), Some(1));
    assert_eq!(board.piece_at(-40.0, 50.0), None);
}

#[test]
fn topmost_piece_wins_overlaps() {
    let mut board = loose_board(2, 1);
    board.place_group(0, 0.0, 0.0);
    board.place_group(1, 20.0, 0.0);
    board.begin_drag(0);
    assert_eq!(board.piece_at(60.0, 50.0), Some(0));
    board.begin_drag(1);
    assert_eq!(board.piece_at(60.0, 50.0), Some(1));
}

#[test]
fn tray_pieces_are_not_snap_targets() {
    let mut board = loose_board(2, 1);
    assert!(board.set_in_tray(1, true));
    board.place_group(1, 500.0, 500.0);
    board.place_group(0, 400.0, 500.0);
    assert_eq!(board.end_drag(0), DropOutcome::Floating);

    board.begin_drag(1);
    assert!(!board.piece(1).expect("piece").in_tray);
    assert!(board.end_drag(1).snapped());
    assert!(!board.set_in_tray(1, true));
}

#[test]
fn scramble_is_deterministic_and_spares_locked_pieces() {
    let mut a = board(4, 3);
    a.place_group(5, 103.0, 98.0);
    assert!(a.end_drag(5).snapped());
    let mut b = a.clone();

    a.scramble(7);
    b.scramble(7);
    assert_eq!(a.pieces(), b.pieces());
    assert_eq!(position(&a, 5), (100.0, 100.0));
    assert_eq!(position(&a, 1), (100.0, 0.0));

    let area = a.workspace();
    let (w, h) = a.piece_size();
    for piece in a.pieces().iter().filter(|p| !a.is_locked(p.id)) {
        assert!(piece.x >= area.min_x && piece.x + w <= area.min_x + area.width + 1e-3);
        assert!(piece.y >= area.min_y && piece.y + h <= area.min_y + area.height + 1e-3);
    }
    let mut z: Vec<u32> = a.pieces().iter().map(|p| p.z_index).collect();
    z.sort_unstable();
    assert_eq!(z, (0..12).collect::<Vec<u32>>());
}

#[test]
fn merge_policy_table() {
    assert_eq!(MergePolicy::decide(false, false), Some(MergePolicy::MoveDragged));
    assert_eq!(MergePolicy::decide(false, true), Some(MergePolicy::MoveDragged));
    assert_eq!(MergePolicy::decide(true, false), None);
    assert_eq!(MergePolicy::decide(true, true), Some(MergePolicy::IdentityOnly));
}

#[test]
fn unknown_piece_changes_nothing() {
    let mut board = board(2, 1);
    let before = board.pieces().to_vec();

    assert_eq!(board.begin_drag(99), None);
    assert!(!board.drag_to(99, 1.0, 1.0));
    assert_eq!(board.end_drag(99), DropOutcome::Ignored);
    assert!(!board.set_in_tray(99, true));
    assert_eq!(board.group_of(99), None);
    assert!(board.members(99).is_empty());

    assert_eq!(board.pieces(), &before[..]);
    assert_eq!(board.groups().partition(), vec![vec![0], vec![1]]);
}
