//! Pieces module - Tetromino shapes and SRS rotation system
//!
//! Implements the Super Rotation System (SRS) with wall kick tables.
//! Reference: https://tetris.wiki/SRS
//!
//! Shapes live in the SRS bounding boxes (4x4 for I and O, 3x3 for the rest)
//! with y growing downward. The published kick tables use y pointing up, so
//! every vertical kick below has its sign flipped relative to the wiki.

use crate::types::{MinoOffset, PieceKind, PieceShape, Rotation, RotationDirection};

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        // N: horizontal, row 1
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        // E: vertical, column 2
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        // S: horizontal, row 2
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        // W: vertical, column 1
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Column at which a piece spawns so its North bounding box is centred.
pub fn spawn_x(kind: PieceKind, width: u8) -> i8 {
    let box_width = get_shape(kind, Rotation::North)
        .iter()
        .map(|&(dx, _)| dx + 1)
        .max()
        .unwrap_or(1);
    ((width as i8 - box_width) / 2).max(0)
}

/// SRS wall kick data
///
/// One row per from→to transition, each row tried left to right.
/// Entry 0 is always the unkicked rotation.
pub type KickTable = [[MinoOffset; 5]; 8];

/// O piece only ever tries the unkicked position
const O_KICKS: [MinoOffset; 1] = [(0, 0)];

/// JLSTZ kick table (shared by J, L, S, T, Z), board space (y down)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 1->0 (E->N)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->2 (E->S)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2->1 (S->E)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 2->3 (S->W)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 3->2 (W->S)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 3->0 (W->N)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
];

/// I piece kick table (different from JLSTZ), board space (y down)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
];

/// Row of the kick tables for a quarter-turn transition
fn get_kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    use Rotation::*;
    match (from, to) {
        (North, East) => Some(0),
        (East, North) => Some(1),
        (East, South) => Some(2),
        (South, East) => Some(3),
        (South, West) => Some(4),
        (West, South) => Some(5),
        (West, North) => Some(6),
        (North, West) => Some(7),
        _ => None,
    }
}

/// Ordered kick candidates for rotating `kind` from `from` to `to`.
///
/// Returns `None` for transitions that are not a quarter turn.
pub fn wall_kicks(kind: PieceKind, from: Rotation, to: Rotation) -> Option<&'static [MinoOffset]> {
    let index = get_kick_index(from, to)?;
    Some(match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS[index],
        _ => &JLSTZ_KICKS[index],
    })
}

/// Try to rotate a piece with wall kicks
///
/// Returns `Some((new_rotation, kick_offset))` for the first kick candidate at
/// which every mino satisfies `is_free`, `None` if all fail. The O piece never
/// rotates.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    direction: RotationDirection,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, MinoOffset)> {
    if kind == PieceKind::O {
        return None;
    }

    let new_rotation = rotation.rotate(direction);
    let new_shape = get_shape(kind, new_rotation);
    let kicks = wall_kicks(kind, rotation, new_rotation)?;

    kicks.iter().copied().find(|&(kx, ky)| {
        new_shape
            .iter()
            .all(|&(mx, my)| is_free(x + kx + mx, y + ky + my))
    })
    .map(|kick| (new_rotation, kick))
}
