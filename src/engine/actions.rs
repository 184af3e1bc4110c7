use tracing::debug;

use crate::engine::state::PlayerState;
use crate::world::{self, Coord, TileKind};

pub const NO_DESTINATION: &str = "No destination.";
pub const INVALID_TELEPORTER: &str = "Invalid teleporter.";
pub const TELEPORTED: &str = "Teleported!";

pub fn floor_change_message(z: i32) -> String {
    format!("Moved to floor {z}")
}

/// Apply the effect of the tile the player has just stepped onto.
///
/// Returns the destination when the effect moved the player again (stairs or
/// teleport); the caller owns persisting that second commit. Unknown codes
/// and non-moving kinds do nothing here: any text they carry is shown by the
/// presentation layer.
pub fn handle_tile_interaction(
    world: &world::World,
    state: &mut PlayerState,
    tile: &world::Tile,
) -> Option<Coord> {
    let def = world.resolve_code(&tile.code)?;

    match def.kind {
        TileKind::StairsDown | TileKind::StairsUp => handle_stairs(world, state, tile),
        TileKind::Teleport => handle_teleport(world, state, tile),
        _ => None,
    }
}

fn handle_stairs(
    world: &world::World,
    state: &mut PlayerState,
    tile: &world::Tile,
) -> Option<Coord> {
    let Some(dest) = tile.data.as_ref().and_then(|d| d.to) else {
        state.set_status_message(NO_DESTINATION);
        return None;
    };

    if !world.is_floor_loaded(dest.z) || world.tile_at(dest).is_none() {
        debug!(to = %dest, "stairs_destination_missing");
        state.set_status_message(NO_DESTINATION);
        return None;
    }

    state.set_position(dest);
    state.set_status_message(floor_change_message(dest.z));
    Some(dest)
}

fn handle_teleport(
    world: &world::World,
    state: &mut PlayerState,
    tile: &world::Tile,
) -> Option<Coord> {
    let Some(link_id) = tile
        .data
        .as_ref()
        .and_then(|d| d.link_id.as_deref())
        .filter(|id| !id.is_empty())
    else {
        state.set_status_message(INVALID_TELEPORTER);
        return None;
    };

    let here = state.position();
    let dest = match world.get_link_destination(here.z, link_id, here) {
        Some(dest) if world.tile_at(dest).is_some() => dest,
        _ => {
            debug!(link_id, from = %here, "teleport_destination_missing");
            state.set_status_message(NO_DESTINATION);
            return None;
        }
    };

    state.set_position(dest);
    state.set_status_message(TELEPORTED);
    Some(dest)
}
