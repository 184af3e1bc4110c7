use std::fmt::Write as _;

use crate::engine::output::{Cell, CodeInfo, Frame, Viewport};
use crate::engine::state::PlayerState;
use crate::world;

pub const DEFAULT_VIEWPORT_SIZE: usize = 11;

pub fn format_position(at: world::Coord) -> String {
    format!("{:02} . {:02} . {:02}", at.z, at.y, at.x)
}

/// Square grid centred on the player. An even `size` is rounded up to the
/// next odd one, and zero yields just the player cell.
pub fn build_viewport(world: &world::World, state: &PlayerState, size: usize) -> Viewport {
    let pos = state.position();
    let size = size / 2 * 2 + 1;
    let half = (size / 2) as i32;

    let mut rows = Vec::with_capacity(size);
    for dy in -half..=half {
        let mut row = Vec::with_capacity(size);
        for dx in -half..=half {
            if dy == 0 && dx == 0 {
                row.push(Cell::Player);
                continue;
            }

            let Some(at) = pos.offset(dy, dx) else {
                row.push(Cell::Void);
                continue;
            };
            let cell = match world.tile_at(at) {
                None => Cell::Void,
                Some(_) if !state.is_discovered(at) => Cell::Undiscovered,
                Some(tile) => {
                    let silent = world
                        .resolve_code(&tile.code)
                        .is_some_and(|def| def.silent);
                    Cell::Discovered {
                        label: if silent {
                            String::new()
                        } else {
                            tile.code.clone()
                        },
                    }
                }
            };
            row.push(cell);
        }
        rows.push(row);
    }

    Viewport { size, rows }
}

pub fn build_frame(world: &world::World, state: &PlayerState, viewport_size: usize) -> Frame {
    let pos = state.position();
    let tile = world.tile_at(pos);
    let code_info = tile
        .and_then(|t| world.resolve_code(&t.code))
        .map(|def| CodeInfo {
            label: def.label.clone(),
            kind: def.kind.to_string(),
        });

    let message = if !state.status_message().is_empty() {
        state.status_message().to_string()
    } else {
        tile.and_then(world::Tile::text).unwrap_or_default().to_string()
    };

    Frame {
        position: pos,
        position_label: format_position(pos),
        tile_code: tile.map(|t| t.code.clone()),
        code_info,
        message,
        viewport: build_viewport(world, state, viewport_size),
    }
}

fn cell_glyph(cell: &Cell) -> String {
    match cell {
        Cell::Player => " @ ".to_string(),
        Cell::Void => "   ".to_string(),
        Cell::Undiscovered => " ~ ".to_string(),
        Cell::Discovered { label } if label.is_empty() => " . ".to_string(),
        Cell::Discovered { label } => format!("{label:>3}"),
    }
}

/// Terminal rendering of a frame: the grid, then the status readout.
pub fn render_text(frame: &Frame) -> String {
    let mut out = String::new();

    for row in &frame.viewport.rows {
        let line: String = row.iter().map(cell_glyph).collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Position: {}", frame.position_label);
    let _ = writeln!(
        out,
        "Tile:     {}",
        frame.tile_code.as_deref().unwrap_or("--")
    );
    match &frame.code_info {
        Some(info) => {
            let _ = writeln!(out, "Type:     {} ({})", info.label, info.kind);
        }
        None => {
            let _ = writeln!(out, "Type:     --");
        }
    }
    if !frame.message.is_empty() {
        let _ = writeln!(out, "> {}", frame.message);
    }

    out
}
