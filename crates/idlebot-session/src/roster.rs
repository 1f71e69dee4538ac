//! The roster: who is currently in the game.
//!
//! Names are the identity here, not ids. Roster notices from the server
//! carry only a name, so ids are filled in later when a presence packet
//! for the same name shows up.

use std::collections::HashMap;

use idlebot_protocol::PlayerId;

/// One player known to be in the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// The name as the server first reported it.
    pub name: String,
    pub id: Option<PlayerId>,
    pub is_bot: bool,
}

/// The set of players currently in the game.
///
/// Keyed by ASCII-lowercased name, so "Alice" and "alice" are the same
/// entry. A name is present at most once and [`len`](Self::len) is always
/// the number of distinct names.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: HashMap<String, PlayerRecord>,
}

fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player. Returns `false` if the name was already present, in
    /// which case the existing record is kept.
    pub fn insert(&mut self, name: &str, is_bot: bool) -> bool {
        let mut inserted = false;
        self.players.entry(key(name)).or_insert_with(|| {
            inserted = true;
            PlayerRecord {
                name: name.to_string(),
                id: None,
                is_bot,
            }
        });
        inserted
    }

    /// Removes a player. Removing an absent name is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<PlayerRecord> {
        self.players.remove(&key(name))
    }

    /// Attaches a server id to a player already on the roster.
    ///
    /// Returns `false` (and records nothing) if the name isn't present.
    pub fn set_id(&mut self, name: &str, id: PlayerId) -> bool {
        match self.players.get_mut(&key(name)) {
            Some(record) => {
                record.id = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(&key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(&key(name))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    /// Player names sorted case-insensitively. Handy for logs and snapshots.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut keys: Vec<&String> = self.players.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|k| self.players[k].name.clone())
            .collect()
    }
}
