mod loader;
mod model;

pub use loader::{AssetDir, TILE_CODES_FILE, floor_file_name, parse_floor, parse_tile_codes};

pub use model::{Coord, Floor, GridPos, Tile, TileCodeDef, TileData, TileKind, World};
