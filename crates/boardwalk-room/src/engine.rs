//! The turn engine: one room's state and the rules that mutate it.
//!
//! ```text
//!            add_player              roll (turn holder only)
//! WAITING ──────────────→ ACTIVE ─────────────────────────┐
//!    ↑                      │  ↑                           │
//!    └──remove last player──┘  └───── next player ─────────┘
//! ```
//!
//! There is no terminal state. Rejected actions (wrong player, empty room)
//! leave the room untouched and report nothing.

use boardwalk_protocol::{
    Corner, Player, PlayerId, RoomId, RoomSnapshot, RoomStatus, RoomSummary, TileKind,
};

use crate::{BOARD_SIZE, Board, Dice, GameRules};

/// What happened on the tile a roll landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEffect {
    /// Bought an unowned property.
    Purchased { price: i64 },
    /// Landed on someone else's property. The rent leaves the game; the
    /// owner is not credited.
    PaidRent { rent: i64 },
    PaidTax { amount: i64 },
    SentToJail,
    /// Inert tile, own property, or an unowned property the roller
    /// cannot afford.
    Nothing,
}

/// The result of an accepted roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    pub player_id: PlayerId,
    pub dice: [u8; 2],
    /// Board index the player ended on (after any jail redirect).
    pub position: usize,
    pub effect: TileEffect,
    /// Index of the player who holds the turn next.
    pub next_player_index: usize,
}

/// State of one game room.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    mode: String,
    board: Board,
    /// Join order is turn order.
    players: Vec<Player>,
    current_player_index: usize,
    created_at: i64,
    rules: GameRules,
}

impl Room {
    /// Creates an empty room with a freshly generated board.
    pub fn new(id: RoomId, mode: impl Into<String>, rules: GameRules) -> Self {
        Self {
            id,
            mode: mode.into(),
            board: Board::generate(),
            players: Vec::new(),
            current_player_index: 0,
            created_at: chrono::Utc::now().timestamp_millis(),
            rules,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn status(&self) -> RoomStatus {
        if self.players.is_empty() {
            RoomStatus::Waiting
        } else {
            RoomStatus::Active
        }
    }

    /// The player whose roll will be honored next.
    pub fn turn_holder(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Seats a new player at the end of the turn order.
    ///
    /// An empty or missing nickname becomes `Player-` plus the first four
    /// characters of the id. Returns `false` (and changes nothing) if the
    /// player is already seated.
    pub fn add_player(&mut self, id: PlayerId, nickname: Option<&str>) -> bool {
        if self.player(&id).is_some() {
            return false;
        }
        let nickname = match nickname {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_nickname(&id),
        };
        self.players.push(Player {
            id,
            nickname,
            position: 0,
            cash: self.rules.starting_cash,
            properties: Vec::new(),
            in_jail: false,
            last_roll: [0, 0],
        });
        true
    }

    /// Removes a player. Their properties go back to the bank.
    ///
    /// Returns `false` if the player was not seated. The turn index is
    /// reset to 0 if the shrink leaves it out of range.
    pub fn remove_player(&mut self, id: &PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| &p.id != id);
        if self.players.len() == before {
            return false;
        }
        if self.current_player_index >= self.players.len() {
            self.current_player_index = 0;
        }
        true
    }

    /// Returns the index of the player owning the property at `tile`.
    pub fn owner_of(&self, tile: usize) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.properties.contains(&tile))
    }

    /// Takes a turn for `requester`.
    ///
    /// Returns `None`, with no state change, if the room is empty or the
    /// requester does not hold the turn.
    pub fn roll(&mut self, requester: &PlayerId, dice: &dyn Dice) -> Option<RollOutcome> {
        let current = self.current_player_index;
        if self.players.get(current)?.id != *requester {
            return None;
        }

        let pair = dice.roll();
        let steps = usize::from(pair[0]) + usize::from(pair[1]);
        let landed = (self.players[current].position + steps) % BOARD_SIZE;
        let owner = self.owner_of(landed);
        let seated = self.players.len();
        let tile = self.board.tile(landed);

        let player = &mut self.players[current];
        player.last_roll = pair;
        player.position = landed;

        let effect = match &tile.kind {
            TileKind::Property { price, rent, .. } => match owner {
                None if player.cash >= *price => {
                    player.cash -= price;
                    player.properties.push(landed);
                    TileEffect::Purchased { price: *price }
                }
                Some(owner) if owner != current => {
                    player.cash -= rent;
                    TileEffect::PaidRent { rent: *rent }
                }
                _ => TileEffect::Nothing,
            },
            TileKind::Tax => {
                player.cash -= self.rules.tax_amount;
                TileEffect::PaidTax {
                    amount: self.rules.tax_amount,
                }
            }
            TileKind::Corner {
                corner: Corner::GoToJail,
            } => {
                player.position = self.rules.jail_position;
                player.in_jail = true;
                TileEffect::SentToJail
            }
            TileKind::Corner { .. } | TileKind::Chance | TileKind::Rail => TileEffect::Nothing,
        };

        let outcome = RollOutcome {
            player_id: player.id.clone(),
            dice: pair,
            position: player.position,
            effect,
            next_player_index: (current + 1) % seated,
        };
        self.current_player_index = outcome.next_player_index;
        Some(outcome)
    }

    /// Full state for the room's members.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id.clone(),
            mode: self.mode.clone(),
            board: self.board.tiles().to_vec(),
            players: self.players.clone(),
            current_player_index: self.current_player_index,
            status: self.status(),
            created_at: self.created_at,
        }
    }

    /// The lobby-list entry for this room.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            mode: self.mode.clone(),
            players: self.players.len(),
            status: self.status(),
        }
    }
}

fn default_nickname(id: &PlayerId) -> String {
    let prefix: String = id.as_str().chars().take(4).collect();
    format!("Player-{prefix}")
}
