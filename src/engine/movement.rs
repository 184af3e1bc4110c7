use std::fmt;

use tracing::{debug, info};

use crate::engine::actions::handle_tile_interaction;
use crate::engine::persist::{SaveStore, save_state};
use crate::engine::state::PlayerState;
use crate::world::{self, Coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn from_name(name: &str) -> Option<Direction> {
        match name.trim().to_ascii_lowercase().as_str() {
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "east" => Some(Direction::East),
            "west" => Some(Direction::West),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    /// Unit step as (dy, dx).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target was void; nothing changed.
    Blocked,
    /// Player now stands on the target tile.
    Moved { to: Coord },
    /// Player stepped onto `via` and a stairs or teleport effect carried
    /// them on to `to`.
    Transited { via: Coord, to: Coord },
}

impl MoveOutcome {
    pub fn changed_state(&self) -> bool {
        !matches!(self, MoveOutcome::Blocked)
    }
}

/// One step of player movement.
///
/// Arrival on the target tile is committed and saved first; a stairs or
/// teleport effect then commits the destination and saves again, so a save
/// slot always holds either the arrival tile or the final one.
pub fn try_handle_movement(
    world: &world::World,
    state: &mut PlayerState,
    store: &mut dyn SaveStore,
    direction: Direction,
) -> MoveOutcome {
    let (dy, dx) = direction.delta();
    let here = state.position();

    let Some((target, tile)) = here
        .offset(dy, dx)
        .and_then(|target| world.tile_at(target).map(|tile| (target, tile)))
    else {
        debug!(%direction, from = %here, "move_blocked");
        return MoveOutcome::Blocked;
    };

    state.set_position(target);
    state.clear_status_message();
    save_state(store, state);

    match handle_tile_interaction(world, state, tile) {
        Some(dest) => {
            save_state(store, state);
            info!(via = %target, to = %dest, code = %tile.code, "player_transited");
            MoveOutcome::Transited {
                via: target,
                to: dest,
            }
        }
        None => MoveOutcome::Moved { to: target },
    }
}
