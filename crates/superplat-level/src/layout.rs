use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use superplat_core::geometry::Vec2;

use crate::behavior::Entity;
use crate::config::{ConfigError, LevelConfig};
use crate::context::LevelBounds;
use crate::entities::{block, enemy, finish, item};
use crate::tile::{Corner, Tile, TileKind};

/// Horizontal inset of a placed coin within its grid cell.
const COIN_INSET: f32 = 2.0;

/// Static geometry kinds a layout can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileSpec {
    /// Walkable one-way ground surface.
    Grass,
    /// Fill below grass; scenery only.
    Dirt,
    Stone,
    Wood,
    Pipe,
    /// Floating one-way platform.
    Cloud,
}

/// Entity kinds a layout can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    Chicken,
    Gum,
    Biter,
    /// Lives in the pipe tile at the same cell.
    Plunger,
    Coin,
    CoinBlock {
        coins: u32,
    },
    GiftBlock,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub x: u32,
    pub y: u32,
    pub tile: TileSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPlacement {
    pub x: u32,
    pub y: u32,
    pub kind: SpawnKind,
}

/// In-memory level description on a tile grid. Cell coordinates are scaled by
/// `tile_size` into world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub tile_size: u32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    /// Seconds on the clock at the start of each life.
    pub time_limit: u32,
    /// Player spawn cell.
    pub spawn: (u32, u32),
    pub tiles: Vec<TilePlacement>,
    pub entities: Vec<SpawnPlacement>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            tile_size: 16,
            tiles_x: 0,
            tiles_y: 0,
            time_limit: 300,
            spawn: (0, 0),
            tiles: Vec::new(),
            entities: Vec::new(),
        }
    }
}

impl LevelLayout {
    /// An empty level of the given grid size.
    pub fn new(tiles_x: u32, tiles_y: u32, tile_size: u32) -> Self {
        Self {
            tile_size,
            tiles_x,
            tiles_y,
            ..Self::default()
        }
    }

    pub fn with_spawn(mut self, x: u32, y: u32) -> Self {
        self.spawn = (x, y);
        self
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit = seconds;
        self
    }

    pub fn tile(mut self, x: u32, y: u32, tile: TileSpec) -> Self {
        self.tiles.push(TilePlacement { x, y, tile });
        self
    }

    /// Fill columns `x0..x1` of row `y`.
    pub fn row(mut self, x0: u32, x1: u32, y: u32, tile: TileSpec) -> Self {
        self.tiles.extend((x0..x1).map(|x| TilePlacement { x, y, tile }));
        self
    }

    pub fn entity(mut self, x: u32, y: u32, kind: SpawnKind) -> Self {
        self.entities.push(SpawnPlacement { x, y, kind });
        self
    }

    /// World-space size of the grid. Scaled in `f32` so oversized grids
    /// cannot overflow.
    pub fn bounds(&self) -> LevelBounds {
        let size = self.tile_size as f32;
        LevelBounds::new(self.tiles_x as f32 * size, self.tiles_y as f32 * size)
    }

    fn cell(&self, x: u32, y: u32) -> Vec2 {
        let size = self.tile_size as f32;
        Vec2::new(x as f32 * size, y as f32 * size)
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.cell(self.spawn.0, self.spawn.1)
    }

    /// Build static geometry. Grass edges get corner markers, and grass
    /// stacked into a wall blocks sideways on its open face.
    pub fn build_tiles(&self) -> Vec<Tile> {
        let grid: HashMap<(i64, i64), TileSpec> = self
            .tiles
            .iter()
            .map(|t| ((i64::from(t.x), i64::from(t.y)), t.tile))
            .collect();
        let at = |x: i64, y: i64| grid.get(&(x, y)).copied();
        let grass = |x: i64, y: i64| at(x, y) == Some(TileSpec::Grass);

        self.tiles
            .iter()
            .map(|placement| {
                let position = self.cell(placement.x, placement.y);
                let size = self.tile_size;
                let (x, y) = (i64::from(placement.x), i64::from(placement.y));
                match placement.tile {
                    TileSpec::Grass => {
                        let above = grass(x, y - 1);
                        let below = grass(x, y + 1);
                        let stacked = above || below;
                        let (collide_left, collide_right) = match (stacked, grass(x - 1, y)) {
                            (true, true) => (false, above),
                            (true, false) => (above, false),
                            (false, _) => (false, false),
                        };
                        let corner = if at(x - 1, y).is_none() {
                            Corner::Left
                        } else if at(x + 1, y).is_none() {
                            Corner::Right
                        } else {
                            Corner::None
                        };
                        Tile::platform(position, size, collide_left, collide_right)
                            .with_corner(corner)
                    },
                    TileSpec::Dirt => Tile::new(position, size, TileKind::Solid, false),
                    TileSpec::Stone | TileSpec::Wood | TileSpec::Pipe => {
                        Tile::solid(position, size)
                    },
                    TileSpec::Cloud => Tile::platform(position, size, false, false),
                }
            })
            .collect()
    }

    /// Build every entity the layout places, in placement order. The player is
    /// not part of the layout.
    pub fn build_entities(&self, config: &LevelConfig) -> Vec<Entity> {
        self.entities
            .iter()
            .map(|placement| {
                let position = self.cell(placement.x, placement.y);
                match placement.kind {
                    SpawnKind::Chicken => enemy::chicken(position, config),
                    SpawnKind::Gum => enemy::gum(position, config),
                    SpawnKind::Biter => enemy::biter(position),
                    SpawnKind::Plunger => enemy::plunger(position),
                    SpawnKind::Coin => {
                        item::coin(Vec2::new(position.x + COIN_INSET, position.y))
                    },
                    SpawnKind::CoinBlock { coins } => {
                        block::coin_block(position, self.tile_size, coins, config)
                    },
                    SpawnKind::GiftBlock => block::gift_block(position, self.tile_size),
                    SpawnKind::Finish => finish::finish_line(position),
                }
            })
            .collect()
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// A small course using every tile and entity kind.
    pub fn demo() -> Self {
        Self::new(48, 15, 16)
            .with_spawn(2, 10)
            .with_time_limit(300)
            .row(0, 20, 12, TileSpec::Grass)
            .row(0, 20, 13, TileSpec::Dirt)
            .row(0, 20, 14, TileSpec::Dirt)
            .row(22, 48, 12, TileSpec::Grass)
            .row(22, 48, 13, TileSpec::Dirt)
            .row(22, 48, 14, TileSpec::Dirt)
            .tile(14, 11, TileSpec::Grass)
            .tile(14, 10, TileSpec::Grass)
            .row(25, 29, 8, TileSpec::Cloud)
            .tile(32, 11, TileSpec::Pipe)
            .tile(8, 8, TileSpec::Stone)
            .tile(11, 8, TileSpec::Wood)
            .entity(9, 8, SpawnKind::CoinBlock { coins: 3 })
            .entity(10, 8, SpawnKind::GiftBlock)
            .entity(6, 11, SpawnKind::Gum)
            .entity(18, 10, SpawnKind::Chicken)
            .entity(25, 7, SpawnKind::Coin)
            .entity(26, 7, SpawnKind::Coin)
            .entity(27, 7, SpawnKind::Coin)
            .entity(28, 7, SpawnKind::Coin)
            .entity(32, 11, SpawnKind::Plunger)
            .entity(36, 11, SpawnKind::Biter)
            .entity(44, 8, SpawnKind::Finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Kind;

    #[test]
    fn cells_scale_by_tile_size() {
        let layout = LevelLayout::new(10, 5, 16).with_spawn(2, 3);
        assert_eq!(layout.spawn_position(), Vec2::new(32.0, 48.0));
        assert_eq!(layout.bounds(), LevelBounds::new(160.0, 80.0));
    }

    #[test]
    fn tile_specs_map_to_geometry() {
        let layout = LevelLayout::new(8, 4, 16)
            .tile(0, 3, TileSpec::Dirt)
            .tile(1, 3, TileSpec::Stone)
            .tile(2, 3, TileSpec::Cloud);
        let tiles = layout.build_tiles();
        assert!(!tiles[0].body.collidable);
        assert_eq!(tiles[1].kind, TileKind::Solid);
        assert!(tiles[1].body.collidable);
        assert_eq!(
            tiles[2].kind,
            TileKind::Platform {
                collide_left: false,
                collide_right: false
            }
        );
        assert_eq!(tiles[2].body.position, Vec2::new(32.0, 48.0));
    }

    #[test]
    fn grass_edges_are_marked() {
        let layout = LevelLayout::new(8, 4, 16).row(1, 4, 3, TileSpec::Grass);
        let corners: Vec<Corner> = layout.build_tiles().iter().map(|t| t.corner).collect();
        assert_eq!(corners, vec![Corner::Left, Corner::None, Corner::Right]);
    }

    #[test]
    fn stacked_grass_blocks_on_its_open_side() {
        // A two-high ledge at the right end of a grass run.
        let layout = LevelLayout::new(8, 4, 16)
            .row(0, 3, 3, TileSpec::Grass)
            .tile(2, 2, TileSpec::Grass);
        let tiles = layout.build_tiles();
        // Lower piece of the ledge: grass above and to the left.
        assert_eq!(
            tiles[2].kind,
            TileKind::Platform {
                collide_left: false,
                collide_right: true
            }
        );
        // Top piece: nothing above, so no side blocking.
        assert_eq!(
            tiles[3].kind,
            TileKind::Platform {
                collide_left: false,
                collide_right: false
            }
        );
    }

    #[test]
    fn entities_build_in_placement_order() {
        let config = LevelConfig::default();
        let layout = LevelLayout::new(8, 4, 16)
            .entity(1, 1, SpawnKind::Coin)
            .entity(2, 1, SpawnKind::Gum)
            .entity(3, 1, SpawnKind::CoinBlock { coins: 2 })
            .entity(4, 2, SpawnKind::Plunger);
        let entities = layout.build_entities(&config);
        let kinds: Vec<Kind> = entities.iter().map(Entity::kind).collect();
        assert_eq!(kinds, [Kind::Coin, Kind::Enemy, Kind::Block, Kind::Enemy]);
        assert_eq!(entities[0].body.position, Vec2::new(18.0, 16.0));
        assert_eq!(entities[3].body.position, Vec2::new(64.0, 12.0));
    }

    #[test]
    fn layout_deserializes_with_defaults() {
        let layout = LevelLayout::from_toml(
            r#"
            tiles_x = 4
            tiles_y = 2
            spawn = [1, 0]

            [[tiles]]
            x = 0
            y = 1
            tile = "grass"

            [[entities]]
            x = 2
            y = 0
            kind = { coin_block = { coins = 3 } }
            "#,
        )
        .unwrap();
        assert_eq!(layout.tile_size, 16);
        assert_eq!(layout.time_limit, 300);
        assert_eq!(layout.tiles.len(), 1);
        assert_eq!(layout.entities[0].kind, SpawnKind::CoinBlock { coins: 3 });
    }

    #[test]
    fn unknown_tile_is_a_parse_error() {
        let err = LevelLayout::from_toml("[[tiles]]\nx = 0\ny = 0\ntile = \"lava\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn oversized_grid_bounds_do_not_overflow() {
        let layout = LevelLayout::from_toml("tiles_x = 300000000\ntiles_y = 1").unwrap();
        let bounds = layout.bounds();
        assert_eq!(bounds.width, 300_000_000.0 * 16.0);
        assert_eq!(bounds.height, 16.0);

        let far = LevelLayout::new(1, 1, u32::MAX).with_spawn(u32::MAX, 2);
        assert!(far.spawn_position().x.is_finite());
        assert!(far.spawn_position().x > u32::MAX as f32);
    }

    #[test]
    fn demo_is_buildable() {
        let layout = LevelLayout::demo();
        let config = LevelConfig::default();
        assert_eq!(layout.build_tiles().len(), layout.tiles.len());
        assert_eq!(layout.build_entities(&config).len(), layout.entities.len());
        let bounds = layout.bounds();
        assert!(layout.spawn_position().x < bounds.width);
    }
}
