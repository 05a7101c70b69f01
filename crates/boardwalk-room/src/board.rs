//! The board: 40 tiles laid out by fixed rules.
//!
//! Corners, chance, tax, and rail squares sit at fixed indices. Every other
//! index is a property whose price and rent derive from the index, named
//! and colored from fixed palettes.

use boardwalk_protocol::{Corner, Tile, TileKind};

/// Number of tiles on every board.
pub const BOARD_SIZE: usize = 40;

const CORNERS: [(usize, Corner); 4] = [
    (0, Corner::Start),
    (10, Corner::Jail),
    (20, Corner::FreeParking),
    (30, Corner::GoToJail),
];
const CHANCE: [usize; 6] = [2, 7, 17, 22, 33, 36];
const TAX: [usize; 2] = [4, 38];
const RAIL: [usize; 4] = [5, 15, 25, 35];

const COLORS: [&str; 8] = [
    "#8b5d33", "#7fb1ff", "#d26bc0", "#f39b44", "#e24f4f", "#f0d34a", "#3bb273", "#1b2f7a",
];

/// Property names, assigned in board order and cycled once exhausted.
const NAMES: [&str; 22] = [
    "Harbor Row",
    "Mill Lane",
    "Copper Street",
    "Lantern Square",
    "Orchard Way",
    "Canal Walk",
    "Granite Court",
    "Station Road",
    "Willow Close",
    "Market Arcade",
    "Foundry Yard",
    "Beacon Hill",
    "Quarry Gate",
    "Riverside Drive",
    "Signal Point",
    "Tannery Lane",
    "Observatory Rise",
    "Printworks",
    "Glasshouse Row",
    "Northgate",
    "Cathedral Close",
    "Skyline Terrace",
];

/// An ordered, immutable sequence of exactly [`BOARD_SIZE`] tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Builds the standard board. Deterministic: every call returns the
    /// same tiles.
    pub fn generate() -> Self {
        let mut property_ordinal = 0;
        let tiles = (0..BOARD_SIZE)
            .map(|id| {
                if let Some((_, corner)) = CORNERS.iter().find(|(i, _)| *i == id) {
                    return Tile {
                        id,
                        name: corner.name().to_string(),
                        kind: TileKind::Corner { corner: *corner },
                    };
                }
                let fixed = if CHANCE.contains(&id) {
                    Some(("Chance", TileKind::Chance))
                } else if TAX.contains(&id) {
                    Some(("Tax", TileKind::Tax))
                } else if RAIL.contains(&id) {
                    Some(("Transit", TileKind::Rail))
                } else {
                    None
                };
                if let Some((name, kind)) = fixed {
                    return Tile {
                        id,
                        name: name.to_string(),
                        kind,
                    };
                }

                let name = NAMES[property_ordinal % NAMES.len()];
                property_ordinal += 1;
                Tile {
                    id,
                    name: name.to_string(),
                    kind: TileKind::Property {
                        color: COLORS[((id - 1) / 5) % COLORS.len()].to_string(),
                        price: 100 + (id % 10) as i64 * 20,
                        rent: 10 + (id % 8) as i64 * 5,
                    },
                }
            })
            .collect();
        Self { tiles }
    }

    /// Returns the tile at `index`, wrapping around the board.
    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index % BOARD_SIZE]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property_indices(board: &Board) -> Vec<usize> {
        board
            .tiles()
            .iter()
            .filter(|t| t.property_terms().is_some())
            .map(|t| t.id)
            .collect()
    }

    #[test]
    fn test_board_has_forty_tiles_indexed_in_order() {
        let board = Board::generate();
        assert_eq!(board.len(), BOARD_SIZE);
        for (i, tile) in board.tiles().iter().enumerate() {
            assert_eq!(tile.id, i);
        }
    }

    #[test]
    fn test_board_tile_zero_is_start() {
        let board = Board::generate();
        assert!(board.tile(0).is_corner(Corner::Start));
        assert_eq!(board.tile(0).name, "Start");
    }

    #[test]
    fn test_board_corners() {
        let board = Board::generate();
        for i in [0, 10, 20, 30] {
            assert!(matches!(board.tile(i).kind, TileKind::Corner { .. }));
        }
        assert!(board.tile(10).is_corner(Corner::Jail));
        assert!(board.tile(20).is_corner(Corner::FreeParking));
        assert!(board.tile(30).is_corner(Corner::GoToJail));
        assert_eq!(board.tile(30).name, "Go-To-Jail");
    }

    #[test]
    fn test_board_fixed_special_tiles() {
        let board = Board::generate();
        for i in CHANCE {
            assert_eq!(board.tile(i).kind, TileKind::Chance);
        }
        for i in TAX {
            assert_eq!(board.tile(i).kind, TileKind::Tax);
        }
        for i in RAIL {
            assert_eq!(board.tile(i).kind, TileKind::Rail);
        }
    }

    #[test]
    fn test_board_remaining_tiles_are_properties() {
        let board = Board::generate();
        let props = property_indices(&board);
        assert_eq!(props.len(), 24);
        assert_eq!(props.first(), Some(&1));
        assert_eq!(props.last(), Some(&39));
    }

    #[test]
    fn test_property_price_and_rent_derive_from_index() {
        let board = Board::generate();
        for i in property_indices(&board) {
            let (price, rent) = board.tile(i).property_terms().unwrap();
            assert_eq!(price, 100 + (i % 10) as i64 * 20, "price at {i}");
            assert_eq!(rent, 10 + (i % 8) as i64 * 5, "rent at {i}");
        }
        assert_eq!(board.tile(1).property_terms(), Some((120, 15)));
        assert_eq!(board.tile(39).property_terms(), Some((280, 45)));
    }

    #[test]
    fn test_property_names_cycle_through_palette() {
        let board = Board::generate();
        let props = property_indices(&board);
        assert_eq!(board.tile(props[0]).name, NAMES[0]);
        assert_eq!(board.tile(props[21]).name, NAMES[21]);
        assert_eq!(board.tile(props[22]).name, NAMES[0]);
    }

    #[test]
    fn test_property_color_by_block_of_five() {
        let board = Board::generate();
        match &board.tile(1).kind {
            TileKind::Property { color, .. } => assert_eq!(color, COLORS[0]),
            other => panic!("expected property, got {other:?}"),
        }
        match &board.tile(6).kind {
            TileKind::Property { color, .. } => assert_eq!(color, COLORS[1]),
            other => panic!("expected property, got {other:?}"),
        }
    }

    #[test]
    fn test_board_generation_is_deterministic() {
        assert_eq!(Board::generate(), Board::generate());
    }

    #[test]
    fn test_tile_lookup_wraps() {
        let board = Board::generate();
        assert_eq!(board.tile(40), board.tile(0));
        assert_eq!(board.tile(41), board.tile(1));
    }
}
