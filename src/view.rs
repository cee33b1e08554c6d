//! Text view of a [`GameSnapshot`].
//!
//! Renders the visible playfield two characters per cell with a side panel.
//! The output is plain lines so the terminal host only has to print them.

use std::fmt::Write as _;

use crate::core::snapshot::GameSnapshot;
use crate::core::ControllerState;
use crate::types::PieceKind;

const EMPTY: &str = " .";
const GHOST: &str = "::";
const PANEL_GAP: &str = "   ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Empty,
    Ghost,
    Block(PieceKind),
}

/// Render `snapshot` into `out`, reusing its line buffers.
pub fn render_into(snapshot: &GameSnapshot, out: &mut Vec<String>) {
    let width = snapshot.width as usize;
    let hidden = snapshot.hidden_rows as usize;
    let visible = (snapshot.height as usize).saturating_sub(hidden);

    let mut tiles = vec![Tile::Empty; width * visible];
    let mut put = |x: i8, y: i8, tile: Tile| {
        if x < 0 || y < hidden as i8 {
            return;
        }
        let (x, y) = (x as usize, y as usize - hidden);
        if x < width && y < visible {
            tiles[y * width + x] = tile;
        }
    };

    for y in 0..snapshot.height as usize {
        for x in 0..width {
            if let Some(kind) = snapshot.cell(x, y) {
                put(x as i8, y as i8, Tile::Block(kind));
            }
        }
    }
    if let Some(ghost) = snapshot.ghost_cells {
        for (x, y) in ghost {
            put(x, y, Tile::Ghost);
        }
    }
    if let Some(active) = snapshot.active {
        for (x, y) in active.cells {
            put(x, y, Tile::Block(active.kind));
        }
    }

    let panel = side_panel(snapshot);
    let lines = visible + 2;
    out.resize_with(lines, String::new);

    let border = format!("+{}+", "-".repeat(width * 2));
    for (i, line) in out.iter_mut().enumerate() {
        line.clear();
        if i == 0 || i == lines - 1 {
            line.push_str(&border);
        } else {
            let row = &tiles[(i - 1) * width..i * width];
            line.push('|');
            for tile in row {
                match tile {
                    Tile::Empty => line.push_str(EMPTY),
                    Tile::Ghost => line.push_str(GHOST),
                    Tile::Block(kind) => {
                        line.push(kind.glyph());
                        line.push(kind.glyph());
                    }
                }
            }
            line.push('|');
        }
        if let Some(text) = panel.get(i) {
            line.push_str(PANEL_GAP);
            line.push_str(text);
        }
    }
}

pub fn render(snapshot: &GameSnapshot) -> Vec<String> {
    let mut out = Vec::new();
    render_into(snapshot, &mut out);
    out
}

/// One-line status for the current controller state
pub fn status_line(snapshot: &GameSnapshot) -> String {
    match snapshot.state {
        ControllerState::Menu => "ENTER to start, Q to quit".to_string(),
        ControllerState::Countdown => {
            format!("READY {}", snapshot.timers.countdown_ms.div_ceil(1000))
        }
        ControllerState::Playing => String::new(),
        ControllerState::Paused => "PAUSED (P to resume)".to_string(),
        ControllerState::LineClearing => match &snapshot.last_clear {
            Some(clear) if clear.perfect_clear => "PERFECT CLEAR".to_string(),
            _ => "CLEAR".to_string(),
        },
        ControllerState::GameOver => "GAME OVER (ENTER to play again)".to_string(),
    }
}

fn side_panel(snapshot: &GameSnapshot) -> Vec<String> {
    let mut panel = Vec::with_capacity(12);
    panel.push(String::new());
    panel.push(format!("SCORE {:>8}", snapshot.score));
    panel.push(format!("LEVEL {:>8}", snapshot.level));
    panel.push(format!("LINES {:>8}", snapshot.lines));
    panel.push(format!("COMBO {:>8}", snapshot.combo));
    panel.push(match snapshot.best_score {
        Some(best) => format!("BEST  {:>8}", best),
        None => "BEST         -".to_string(),
    });
    panel.push(if snapshot.back_to_back {
        "BACK-TO-BACK".to_string()
    } else {
        String::new()
    });

    let hold = snapshot.hold.map(|k| k.glyph()).unwrap_or('-');
    let mut hold_line = format!("HOLD  {}", hold);
    if !snapshot.can_hold {
        hold_line.push_str(" (used)");
    }
    panel.push(hold_line);

    let mut next = String::from("NEXT ");
    for kind in &snapshot.next {
        let _ = write!(next, " {}", kind.glyph());
    }
    panel.push(next);
    panel.push(String::new());
    panel.push(status_line(snapshot));
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameController};
    use crate::types::GameCommand;

    #[test]
    fn test_menu_frame_shape() {
        let game = GameController::new(GameConfig::default());
        let lines = render(&game.snapshot());
        assert_eq!(lines.len(), 22);
        assert!(lines[0].starts_with("+--------------------+"));
        assert!(lines[1].starts_with("| . . . . . . . . . .|"));
        assert!(lines.iter().any(|l| l.contains("ENTER to start")));
    }

    #[test]
    fn test_locked_piece_and_ghost_are_drawn() {
        let mut game = GameController::new(GameConfig::instant());
        game.apply(GameCommand::Start);
        let kind = game.active().map(|a| a.kind()).unwrap();
        game.apply(GameCommand::HardDrop);

        let lines = render(&game.snapshot());
        let glyph = kind.glyph();
        let bottom = &lines[20];
        assert!(bottom.contains(&format!("{glyph}{glyph}")));
        assert!(lines.iter().any(|l| l.contains(GHOST)));
    }

    #[test]
    fn test_countdown_status_rounds_up() {
        let mut game = GameController::new(GameConfig::default());
        game.apply(GameCommand::Start);
        game.tick(1);
        assert_eq!(status_line(&game.snapshot()), "READY 3");
    }
}
