use kumitate_core::game::{DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP};
use kumitate_core::{build_outline, generate, EdgeGrid, EdgeType, LayoutError, ShapeRng};

const EPS: f32 = 1e-3;

fn close(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() <= EPS && (a.1 - b.1).abs() <= EPS
}

#[test]
fn shared_edges_are_complementary() {
    let cols = 7;
    let rows = 5;
    let pieces = generate(700.0, 500.0, cols, rows, 42).expect("layout");
    assert_eq!(pieces.len(), 35);
    let cols = cols as usize;
    for piece in &pieces {
        let col = piece.col as usize;
        let row = piece.row as usize;
        if col + 1 < cols {
            let right = &pieces[piece.id + 1];
            assert!(
                piece.edge(DIR_RIGHT).complements(&right.edge(DIR_LEFT), 1e-6),
                "piece {} right edge does not mate with its neighbor",
                piece.id
            );
        } else {
            assert_eq!(piece.edge(DIR_RIGHT).kind, EdgeType::Flat);
        }
        if row + 1 < rows as usize {
            let below = &pieces[piece.id + cols];
            assert!(piece.edge(DIR_DOWN).complements(&below.edge(DIR_UP), 1e-6));
        } else {
            assert_eq!(piece.edge(DIR_DOWN).kind, EdgeType::Flat);
        }
        if col == 0 {
            assert!(piece.edge(DIR_LEFT).is_flat());
        }
        if row == 0 {
            assert!(piece.edge(DIR_UP).is_flat());
        }
    }
}

#[test]
fn interior_edges_stay_in_range() {
    let grid = EdgeGrid::generate(6, 4, &mut ShapeRng::new(9));
    assert_eq!(grid.interior_lines(), 6 * 3 + 5 * 4);
    for row in 0..4 {
        for line in 1..6 {
            let edge = grid.vertical(row, line);
            assert!(!edge.is_flat());
            assert!((0.8..=1.2).contains(&edge.size));
            assert!((0.35..=0.65).contains(&edge.offset));
            assert!(edge.tilt.abs() <= 0.05);
        }
    }
    assert!(grid.horizontal(0, 2).is_flat());
    assert!(grid.vertical(1, 6).is_flat());
}

#[test]
fn same_seed_same_shapes() {
    let a = generate(400.0, 300.0, 4, 3, 1234).expect("layout");
    let b = generate(400.0, 300.0, 4, 3, 1234).expect("layout");
    let c = generate(400.0, 300.0, 4, 3, 1235).expect("layout");
    assert_eq!(a, b);
    assert_ne!(
        a.iter().map(|piece| piece.edges).collect::<Vec<_>>(),
        c.iter().map(|piece| piece.edges).collect::<Vec<_>>()
    );
}

#[test]
fn outlines_meet_on_shared_edges() {
    let pieces = generate(300.0, 240.0, 3, 2, 77).expect("layout");
    let outlines: Vec<_> = pieces.iter().map(|piece| build_outline(piece, 0.2)).collect();

    // piece 1 and its right neighbor 2, in board coordinates
    let left = &pieces[1];
    let right = &pieces[2];
    let a: Vec<_> = outlines[1]
        .edge(DIR_RIGHT)
        .iter()
        .map(|p| (p.0 + left.solved_x, p.1 + left.solved_y))
        .collect();
    let mut b: Vec<_> = outlines[2]
        .edge(DIR_LEFT)
        .iter()
        .map(|p| (p.0 + right.solved_x, p.1 + right.solved_y))
        .collect();
    b.reverse();
    assert_eq!(a.len(), b.len());
    for (p, q) in a.iter().zip(&b) {
        assert!(close(*p, *q), "{p:?} != {q:?}");
    }

    // piece 0 and the piece below it
    let top = &pieces[0];
    let bottom = &pieces[3];
    let a: Vec<_> = outlines[0]
        .edge(DIR_DOWN)
        .iter()
        .map(|p| (p.0 + top.solved_x, p.1 + top.solved_y))
        .collect();
    let mut b: Vec<_> = outlines[3]
        .edge(DIR_UP)
        .iter()
        .map(|p| (p.0 + bottom.solved_x, p.1 + bottom.solved_y))
        .collect();
    b.reverse();
    for (p, q) in a.iter().zip(&b) {
        assert!(close(*p, *q), "{p:?} != {q:?}");
    }
}

#[test]
fn single_piece_has_no_knobs() {
    let pieces = generate(120.0, 80.0, 1, 1, 5).expect("layout");
    assert_eq!(pieces.len(), 1);
    assert!(pieces[0].edges.iter().all(|edge| edge.is_flat()));
    assert!(pieces[0].is_corner());
    let outline = build_outline(&pieces[0], 0.2);
    assert_eq!(outline.points().len(), 4);
}

#[test]
fn rejects_degenerate_grids() {
    assert_eq!(
        generate(100.0, 100.0, 0, 3, 1),
        Err(LayoutError::EmptyGrid { cols: 0, rows: 3 })
    );
    assert!(matches!(
        generate(0.0, 100.0, 2, 2, 1),
        Err(LayoutError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        generate(f32::NAN, 100.0, 2, 2, 1),
        Err(LayoutError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        generate(100.0, 100.0, 4096, 4096, 1),
        Err(LayoutError::TooManyPieces { .. })
    ));
}
