use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

///////////////////////////
/// COORDINATES & TILES ///
///////////////////////////

/// A point in the dungeon: floor index, row, column. Unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub z: i32,
    pub y: i32,
    pub x: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { z: 0, y: 0, x: 0 };

    pub fn new(z: i32, y: i32, x: i32) -> Self {
        Coord { z, y, x }
    }

    pub fn grid(&self) -> GridPos {
        GridPos {
            y: self.y,
            x: self.x,
        }
    }

    /// Neighbouring coordinate on the same floor. `None` past the edge of
    /// the `i32` grid.
    pub fn offset(&self, dy: i32, dx: i32) -> Option<Coord> {
        Some(Coord {
            z: self.z,
            y: self.y.checked_add(dy)?,
            x: self.x.checked_add(dx)?,
        })
    }

    /// Canonical "z,y,x" text form used in save snapshots.
    pub fn key(&self) -> String {
        format!("{},{},{}", self.z, self.y, self.x)
    }

    pub fn parse_key(key: &str) -> Option<Coord> {
        let mut parts = key.split(',').map(|p| p.trim().parse::<i32>());
        let z = parts.next()?.ok()?;
        let y = parts.next()?.ok()?;
        let x = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Coord { z, y, x })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} . {} . {}", self.z, self.y, self.x)
    }
}

/// Position of a tile within a single floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub y: i32,
    pub x: i32,
}

impl GridPos {
    pub fn on_floor(&self, z: i32) -> Coord {
        Coord {
            z,
            y: self.y,
            x: self.x,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Coord>,
    #[serde(rename = "linkId", default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    // Authored keys the engine has no use for yet.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TileData>,
}

impl Tile {
    pub fn plain(code: impl Into<String>) -> Self {
        Tile {
            code: code.into(),
            data: None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.data.as_ref()?.text.as_deref()
    }
}

/// One z-layer: sparse tiles, teleport links and an optional start point.
#[derive(Debug, Clone, Default)]
pub struct Floor {
    pub tiles: HashMap<GridPos, Tile>,
    pub links: HashMap<String, Vec<Coord>>,
    pub start: Option<Coord>,
}

//////////////////
/// TILE CODES ///
//////////////////

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileKind {
    StairsDown,
    StairsUp,
    Teleport,
    Message,
    Origin,
    Service,
    Encounter,
    Other(String),
}

impl TileKind {
    pub fn as_str(&self) -> &str {
        match self {
            TileKind::StairsDown => "stairs_down",
            TileKind::StairsUp => "stairs_up",
            TileKind::Teleport => "teleport",
            TileKind::Message => "message",
            TileKind::Origin => "origin",
            TileKind::Service => "service",
            TileKind::Encounter => "encounter",
            TileKind::Other(s) => s,
        }
    }

    pub fn is_stairs(&self) -> bool {
        matches!(self, TileKind::StairsDown | TileKind::StairsUp)
    }
}

impl From<&str> for TileKind {
    fn from(raw: &str) -> Self {
        match raw {
            "stairs_down" => TileKind::StairsDown,
            "stairs_up" => TileKind::StairsUp,
            "teleport" => TileKind::Teleport,
            "message" => TileKind::Message,
            "origin" => TileKind::Origin,
            "service" => TileKind::Service,
            "encounter" => TileKind::Encounter,
            other => TileKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TileKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TileKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TileKind::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileCodeDef {
    pub kind: TileKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub silent: bool,
}

/////////////
/// WORLD ///
/////////////

/// Floor cache plus the global tile-code table. Queries never load anything.
#[derive(Debug, Default)]
pub struct World {
    pub(super) tile_codes: Option<HashMap<String, TileCodeDef>>,
    pub(super) floors: HashMap<i32, Floor>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_floor(&self, z: i32) -> Option<&Floor> {
        self.floors.get(&z)
    }

    pub fn is_floor_loaded(&self, z: i32) -> bool {
        self.floors.contains_key(&z)
    }

    pub fn loaded_floors(&self) -> Vec<i32> {
        let mut zs: Vec<i32> = self.floors.keys().copied().collect();
        zs.sort_unstable();
        zs
    }

    pub fn get_tile(&self, z: i32, y: i32, x: i32) -> Option<&Tile> {
        self.floors.get(&z)?.tiles.get(&GridPos { y, x })
    }

    pub fn tile_at(&self, at: Coord) -> Option<&Tile> {
        self.get_tile(at.z, at.y, at.x)
    }

    pub fn resolve_code(&self, code: &str) -> Option<&TileCodeDef> {
        self.tile_codes.as_ref()?.get(code)
    }

    pub fn get_start_position(&self) -> Coord {
        self.floors
            .get(&0)
            .and_then(|floor| floor.start)
            .unwrap_or(Coord::ORIGIN)
    }

    pub fn links(&self, z: i32) -> Option<&HashMap<String, Vec<Coord>>> {
        self.floors.get(&z).map(|floor| &floor.links)
    }

    /// Other end of a teleport link. A link that isn't exactly two endpoints
    /// resolves to nothing. When `current` matches neither endpoint the first
    /// one is returned.
    pub fn get_link_destination(&self, z: i32, link_id: &str, current: Coord) -> Option<Coord> {
        let pair = self.links(z)?.get(link_id)?;
        let [first, second] = pair.as_slice() else {
            return None;
        };

        // Standing on `second`, or on neither end, both lead to `first`.
        if *first == current {
            Some(*second)
        } else {
            Some(*first)
        }
    }

    pub(crate) fn insert_floor(&mut self, z: i32, floor: Floor) {
        self.floors.insert(z, floor);
    }

    pub(crate) fn set_tile_codes(&mut self, codes: HashMap<String, TileCodeDef>) {
        self.tile_codes = Some(codes);
    }

    /// Debug-only: place a tile on an already-loaded floor.
    pub fn insert_tile(&mut self, at: Coord, tile: Tile) -> bool {
        match self.floors.get_mut(&at.z) {
            Some(floor) => {
                floor.tiles.insert(at.grid(), tile);
                true
            }
            None => false,
        }
    }

    /// Debug-only: add or replace a link on an already-loaded floor.
    pub fn insert_link(&mut self, z: i32, link_id: impl Into<String>, ends: [Coord; 2]) -> bool {
        match self.floors.get_mut(&z) {
            Some(floor) => {
                floor.links.insert(link_id.into(), ends.to_vec());
                true
            }
            None => false,
        }
    }
}
