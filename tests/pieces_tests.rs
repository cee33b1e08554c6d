//! Pieces tests - SRS shapes and wall kicks

use prism_tetris::core::pieces::{get_shape, try_rotate, wall_kicks};
use prism_tetris::core::{ActivePiece, GameConfig, Grid};
use prism_tetris::types::{PieceKind, Rotation, RotationDirection};

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(get_shape(PieceKind::I, Rotation::North), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::East), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::South), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::West), [(1, 0), (1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_o_piece_shape_never_changes() {
    let north = get_shape(PieceKind::O, Rotation::North);
    assert_eq!(north, [(1, 0), (2, 0), (1, 1), (2, 1)]);
    for rotation in [Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(get_shape(PieceKind::O, rotation), north);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(get_shape(PieceKind::T, Rotation::North), [(1, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(get_shape(PieceKind::T, Rotation::East), [(1, 0), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(get_shape(PieceKind::T, Rotation::South), [(0, 1), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(get_shape(PieceKind::T, Rotation::West), [(1, 0), (0, 1), (1, 1), (1, 2)]);
}

// ============== Kick Table Tests ==============

#[test]
fn test_jlstz_share_a_table_and_i_has_its_own() {
    let t = wall_kicks(PieceKind::T, Rotation::North, Rotation::East).unwrap();
    for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::Z] {
        assert_eq!(wall_kicks(kind, Rotation::North, Rotation::East).unwrap(), t);
    }
    let i = wall_kicks(PieceKind::I, Rotation::North, Rotation::East).unwrap();
    assert_ne!(i, t);
    assert_eq!(t.len(), 5);
    assert_eq!(i.len(), 5);
}

#[test]
fn test_o_kicks_are_only_identity() {
    assert_eq!(
        wall_kicks(PieceKind::O, Rotation::North, Rotation::East).unwrap(),
        &[(0, 0)]
    );
}

#[test]
fn test_rotation_prefers_unkicked_position() {
    let grid = Grid::standard();
    let result = try_rotate(
        PieceKind::T,
        Rotation::North,
        4,
        10,
        RotationDirection::Clockwise,
        |x, y| grid.is_free(x, y),
    );
    assert_eq!(result, Some((Rotation::East, (0, 0))));
}

#[test]
fn test_rotation_fails_when_every_kick_is_blocked() {
    let result = try_rotate(
        PieceKind::T,
        Rotation::North,
        4,
        10,
        RotationDirection::CounterClockwise,
        |_, _| false,
    );
    assert_eq!(result, None);
}

#[test]
fn test_i_piece_kicks_off_right_wall() {
    // A vertical I hugging the right wall cannot turn flat in place.
    let grid = Grid::standard();
    let config = GameConfig::default();
    let mut piece = ActivePiece::spawn(PieceKind::I, &grid, &config).unwrap();
    assert!(piece.rotate_cw(&grid));
    while piece.move_right(&grid) {}
    assert!(piece.cells().iter().all(|&(x, _)| x == 9));

    assert!(piece.rotate_ccw(&grid));
    assert_eq!(piece.rotation(), Rotation::North);
    assert!(piece.cells().iter().all(|&(x, _)| (0..10).contains(&x)));
}

#[test]
fn test_t_kicks_up_out_of_floor() {
    // North T resting on the floor turns East by climbing one row.
    let grid = Grid::standard();
    let result = try_rotate(
        PieceKind::T,
        Rotation::North,
        3,
        20,
        RotationDirection::Clockwise,
        |x, y| grid.is_free(x, y),
    );
    assert_eq!(result, Some((Rotation::East, (-1, -1))));

    let shape = get_shape(PieceKind::T, Rotation::East);
    assert!(grid.can_place(&shape, 2, 19));
}

/// North I pushed flush against the right wall at the top of the grid.
fn i_against_right_wall(grid: &Grid) -> ActivePiece {
    let mut piece = ActivePiece::spawn(PieceKind::I, grid, &GameConfig::default()).unwrap();
    while piece.move_right(grid) {}
    assert_eq!(piece.position(), (6, 0));
    piece
}

#[test]
fn test_i_rotation_rejected_when_every_kick_blocked() {
    // Row 2 under columns 6, 8 and 9 blocks all five I candidates.
    let mut grid = Grid::standard();
    for x in [6, 8, 9] {
        grid.set(x, 2, Some(PieceKind::J));
    }
    let mut piece = i_against_right_wall(&grid);

    assert!(!piece.rotate_cw(&grid));
    assert_eq!(piece.rotation(), Rotation::North);
    assert_eq!(piece.position(), (6, 0));
}

#[test]
fn test_i_rotation_uses_i_kick_table() {
    // Only the third I candidate (+1, 0) fits; the JLSTZ table has no such kick.
    let mut grid = Grid::standard();
    for x in [6, 8] {
        grid.set(x, 2, Some(PieceKind::J));
    }
    let mut piece = i_against_right_wall(&grid);

    assert_eq!(
        piece.rotate_with_kick(&grid, RotationDirection::Clockwise),
        Some((1, 0))
    );
    assert_eq!(piece.rotation(), Rotation::East);
    assert!(piece.cells().iter().all(|&(x, _)| x == 9));
    assert!(!wall_kicks(PieceKind::T, Rotation::North, Rotation::East)
        .unwrap()
        .contains(&(1, 0)));
}
