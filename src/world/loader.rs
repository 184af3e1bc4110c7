use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::model::{Coord, Floor, GridPos, Tile, TileCodeDef, World};
use crate::error::LoadError;

pub const TILE_CODES_FILE: &str = "tilecodes.v0.json";

////////////////////
/// JSON STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct TileCodesFile {
    codes: HashMap<String, TileCodeDef>,
}

#[derive(Deserialize)]
struct FloorFile {
    #[serde(default)]
    tiles: HashMap<String, Tile>, // "y,x" -> tile
    #[serde(default)]
    links: HashMap<String, Vec<Coord>>,
    #[serde(default)]
    start: Option<Coord>,
}

/////////////////
/// ASSET DIR ///
/////////////////

/// Directory holding the static JSON documents.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tile_codes_path(&self) -> PathBuf {
        self.root.join(TILE_CODES_FILE)
    }

    pub fn floor_path(&self, z: i32) -> PathBuf {
        self.root.join(floor_file_name(z))
    }

    /// Floor indices that have a document in this directory, ascending.
    pub fn discover_floors(&self) -> Result<Vec<i32>, LoadError> {
        let entries = fs::read_dir(&self.root).map_err(|source| LoadError::Read {
            path: self.root.clone(),
            source,
        })?;

        let mut zs = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            if let Some(z) = name.to_str().and_then(parse_floor_file_name) {
                zs.push(z);
            }
        }
        zs.sort_unstable();
        zs.dedup();
        Ok(zs)
    }
}

pub fn floor_file_name(z: i32) -> String {
    format!("floor{:0>2}.v0.json", z)
}

/// Inverse of `floor_file_name`. Names that would not round-trip, such as
/// `floor1.v0.json` or `floor001.v0.json`, are not floor documents.
fn parse_floor_file_name(name: &str) -> Option<i32> {
    let z = name
        .strip_prefix("floor")?
        .strip_suffix(".v0.json")?
        .parse::<i32>()
        .ok()?;
    (floor_file_name(z) == name).then_some(z)
}

/////////////////////////////
/// JSON PARSER FUNCTIONS ///
/////////////////////////////

fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, LoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let message = error.into_inner().to_string();
        if path.is_empty() || path == "." {
            LoadError::Parse {
                what: what.to_string(),
                message,
            }
        } else {
            LoadError::ParseAt {
                what: what.to_string(),
                path_in_doc: path,
                message,
            }
        }
    })
}

fn read_document(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_tile_codes(raw: &str) -> Result<HashMap<String, TileCodeDef>, LoadError> {
    let file: TileCodesFile = parse_json(raw, TILE_CODES_FILE)?;
    Ok(file.codes)
}

pub fn parse_floor(raw: &str, what: &str) -> Result<Floor, LoadError> {
    let file: FloorFile = parse_json(raw, what)?;

    let mut tiles = HashMap::with_capacity(file.tiles.len());
    for (key, tile) in file.tiles {
        let pos = parse_grid_key(&key).ok_or_else(|| LoadError::InvalidTileKey {
            what: what.to_string(),
            key: key.clone(),
        })?;
        tiles.insert(pos, tile);
    }

    Ok(Floor {
        tiles,
        links: file.links,
        start: file.start,
    })
}

fn parse_grid_key(key: &str) -> Option<GridPos> {
    let (y, x) = key.split_once(',')?;
    Some(GridPos {
        y: y.trim().parse().ok()?,
        x: x.trim().parse().ok()?,
    })
}

/////////////////////
/// WORLD LOADING ///
/////////////////////

impl World {
    /// Replace the tile-code table from a JSON document.
    pub fn load_tile_codes_from_str(&mut self, raw: &str) -> Result<usize, LoadError> {
        let codes = parse_tile_codes(raw)?;
        let count = codes.len();
        self.set_tile_codes(codes);
        info!(codes = count, "tile_codes_loaded");
        Ok(count)
    }

    pub fn load_tile_codes(&mut self, assets: &AssetDir) -> Result<usize, LoadError> {
        let raw = read_document(&assets.tile_codes_path())?;
        self.load_tile_codes_from_str(&raw)
    }

    /// Parse floor `z` and replace any cached copy. On error the cache is
    /// left as it was.
    pub fn load_floor_from_str(&mut self, z: i32, raw: &str) -> Result<&Floor, LoadError> {
        let floor = parse_floor(raw, &floor_file_name(z))?;
        info!(
            z,
            tiles = floor.tiles.len(),
            links = floor.links.len(),
            "floor_loaded"
        );
        self.insert_floor(z, floor);
        Ok(&self.floors[&z])
    }

    pub fn load_floor(&mut self, assets: &AssetDir, z: i32) -> Result<&Floor, LoadError> {
        let path = assets.floor_path(z);
        debug!(z, path = %path.display(), "floor_load_requested");
        let raw = read_document(&path)?;
        self.load_floor_from_str(z, &raw)
    }

    /// Tile codes plus the given floors, stopping at the first failure.
    /// An empty `floors` list loads every floor document found.
    pub fn load_from_dir(assets: &AssetDir, floors: &[i32]) -> Result<World, LoadError> {
        let mut world = World::new();
        world.load_tile_codes(assets)?;

        let zs = if floors.is_empty() {
            assets.discover_floors()?
        } else {
            floors.to_vec()
        };
        for z in zs {
            world.load_floor(assets, z)?;
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::world::TileKind;

    const CODES: &str = r#"{
        "codes": {
            "10": { "kind": "stairs_down", "label": "Stairs Down", "silent": false },
            "30": { "kind": "teleport", "label": "Teleporter" },
            "00": { "kind": "origin", "label": "Floor", "silent": true }
        }
    }"#;

    const FLOOR0: &str = r#"{
        "start": { "z": 0, "y": 2, "x": 3 },
        "tiles": {
            "0,0": { "code": "00" },
            "0,1": { "code": "10", "data": { "to": { "z": 1, "y": 0, "x": 0 } } },
            "-4,12": { "code": "30", "data": { "linkId": "L1", "glyph": "*" } }
        },
        "links": {
            "L1": [ { "z": 0, "y": -4, "x": 12 }, { "z": 0, "y": 0, "x": 0 } ]
        }
    }"#;

    #[test]
    fn tile_codes_parse_with_defaults() {
        let mut world = World::new();
        let count = world.load_tile_codes_from_str(CODES).expect("codes");
        assert_eq!(count, 3);

        let stairs = world.resolve_code("10").expect("10");
        assert_eq!(stairs.kind, TileKind::StairsDown);
        assert!(!stairs.silent);
        assert!(!world.resolve_code("30").expect("30").silent);
        assert!(world.resolve_code("00").expect("00").silent);
        assert!(world.resolve_code("99").is_none());
    }

    #[test]
    fn floor_parses_keys_data_links_and_start() {
        let mut world = World::new();
        world.load_floor_from_str(0, FLOOR0).expect("floor");

        assert_eq!(world.get_start_position(), Coord::new(0, 2, 3));
        let stairs = world.get_tile(0, 0, 1).expect("stairs");
        let data = stairs.data.as_ref().expect("data");
        assert_eq!(data.to, Some(Coord::new(1, 0, 0)));

        let tele = world.get_tile(0, -4, 12).expect("teleport");
        let data = tele.data.as_ref().expect("data");
        assert_eq!(data.link_id.as_deref(), Some("L1"));
        assert_eq!(data.extra.get("glyph"), Some(&serde_json::json!("*")));

        assert_eq!(
            world.get_link_destination(0, "L1", Coord::new(0, -4, 12)),
            Some(Coord::ORIGIN)
        );
        assert!(world.get_tile(0, 5, 5).is_none());
    }

    #[test]
    fn bad_tile_key_is_a_load_error() {
        let mut world = World::new();
        let err = world
            .load_floor_from_str(0, r#"{ "tiles": { "zero,one": { "code": "00" } } }"#)
            .expect_err("bad key");
        assert!(matches!(err, LoadError::InvalidTileKey { .. }));
        assert!(!world.is_floor_loaded(0));
    }

    #[test]
    fn parse_error_reports_document_path() {
        let mut world = World::new();
        let err = world
            .load_floor_from_str(2, r#"{ "tiles": { "0,0": { "code": 7 } } }"#)
            .expect_err("code must be a string");
        let msg = err.to_string();
        assert!(msg.contains("floor02.v0.json"), "{msg}");
        assert!(msg.contains("tiles"), "{msg}");
    }

    #[test]
    fn failed_reload_keeps_previous_floor() {
        let mut world = World::new();
        world.load_floor_from_str(0, FLOOR0).expect("floor");
        assert!(world.load_floor_from_str(0, "not json").is_err());
        assert!(world.get_tile(0, 0, 1).is_some());
    }

    #[test]
    fn reload_replaces_cached_floor() {
        let mut world = World::new();
        world.load_floor_from_str(0, FLOOR0).expect("floor");
        world
            .load_floor_from_str(0, r#"{ "tiles": { "9,9": { "code": "00" } } }"#)
            .expect("reload");
        assert!(world.get_tile(0, 0, 1).is_none());
        assert!(world.get_tile(0, 9, 9).is_some());
    }

    #[test]
    fn floor_file_names_are_zero_padded() {
        assert_eq!(floor_file_name(0), "floor00.v0.json");
        assert_eq!(floor_file_name(7), "floor07.v0.json");
        assert_eq!(floor_file_name(12), "floor12.v0.json");
        assert_eq!(parse_floor_file_name("floor07.v0.json"), Some(7));
        assert_eq!(parse_floor_file_name("floor-3.v0.json"), Some(-3));
        assert_eq!(parse_floor_file_name("floor7.v0.json"), None);
        assert_eq!(parse_floor_file_name("floor007.v0.json"), None);
        assert_eq!(parse_floor_file_name("floor+7.v0.json"), None);
        assert_eq!(parse_floor_file_name("floor07.v1.json"), None);
        assert_eq!(parse_floor_file_name("tilecodes.v0.json"), None);
    }

    #[test]
    fn load_from_dir_discovers_floors() {
        let temp = TempDir::new().expect("tempdir");
        let assets = AssetDir::new(temp.path());
        fs::write(assets.tile_codes_path(), CODES).expect("write codes");
        fs::write(assets.floor_path(0), FLOOR0).expect("write floor0");
        fs::write(assets.floor_path(1), r#"{ "tiles": { "0,0": { "code": "00" } } }"#)
            .expect("write floor1");
        fs::write(temp.path().join("notes.txt"), "ignore me").expect("write notes");
        fs::write(temp.path().join("floor2.v0.json"), "not loaded").expect("write stray");
        fs::write(temp.path().join("floor001.v0.json"), "not loaded").expect("write stray");

        assert_eq!(assets.discover_floors().expect("discover"), vec![0, 1]);

        let world = World::load_from_dir(&assets, &[]).expect("world");
        assert_eq!(world.loaded_floors(), vec![0, 1]);
        assert!(world.resolve_code("10").is_some());
    }

    #[test]
    fn missing_documents_are_read_errors() {
        let temp = TempDir::new().expect("tempdir");
        let assets = AssetDir::new(temp.path());

        let err = World::load_from_dir(&assets, &[0]).expect_err("no codes");
        assert!(matches!(err, LoadError::Read { .. }));

        fs::write(assets.tile_codes_path(), CODES).expect("write codes");
        let err = World::load_from_dir(&assets, &[0]).expect_err("no floor");
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
