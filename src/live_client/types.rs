use serde::{Deserialize, Serialize};

// Data structures for the Live Client Data API (https://127.0.0.1:2999/liveclientdata)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
  Order,
  Chaos,
  #[default]
  #[serde(other)]
  Unknown,
}

/// An item in a player's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
  #[serde(default)]
  pub can_use: bool,
  #[serde(default)]
  pub consumable: bool,
  /// Remaining charges / stacks.
  #[serde(default)]
  pub count: i64,
  #[serde(default)]
  pub display_name: String,
  #[serde(rename = "itemID", default)]
  pub item_id: i64,
  #[serde(default)]
  pub price: i64,
  #[serde(default)]
  pub slot: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntry {
  #[serde(default)]
  pub display_name: String,
  #[serde(default)]
  pub id: Option<i64>,
}

/// Keystone and both rune trees as shown for every player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuneSummary {
  #[serde(default)]
  pub keystone: NamedEntry,
  #[serde(default)]
  pub primary_rune_tree: NamedEntry,
  #[serde(default)]
  pub secondary_rune_tree: NamedEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
  #[serde(default)]
  pub assists: i64,
  #[serde(default)]
  pub creep_score: i64,
  #[serde(default)]
  pub deaths: i64,
  #[serde(default)]
  pub kills: i64,
  #[serde(default)]
  pub ward_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerSpells {
  #[serde(default)]
  pub summoner_spell_one: NamedEntry,
  #[serde(default)]
  pub summoner_spell_two: NamedEntry,
}

/// Extra state only the local player gets from `/liveclientdata/activeplayer`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlayerDetails {
  #[serde(default)]
  pub summoner_name: String,
  #[serde(default)]
  pub riot_id: Option<String>,
  #[serde(default)]
  pub abilities: serde_json::Value,
  #[serde(default)]
  pub champion_stats: serde_json::Map<String, serde_json::Value>,
  #[serde(default)]
  pub current_gold: f64,
  #[serde(default)]
  pub full_runes: FullRunes,
  #[serde(default)]
  pub level: i64,
}

impl ActivePlayerDetails {
  pub fn display_name(&self) -> &str {
    display_name(&self.summoner_name, self.riot_id.as_deref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullRunes {
  #[serde(default)]
  pub general_runes: Vec<NamedEntry>,
  #[serde(default)]
  pub stat_runes: Vec<StatRune>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRune {
  #[serde(default)]
  pub id: i64,
  #[serde(default)]
  pub raw_description: String,
}

/// One participant of the running match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
  #[serde(default)]
  pub champion_name: String,
  #[serde(default)]
  pub is_bot: bool,
  #[serde(default)]
  pub is_dead: bool,
  #[serde(default)]
  pub items: Vec<Item>,
  #[serde(default)]
  pub level: i64,
  /// Expected lane; not always accurate.
  #[serde(default)]
  pub position: String,
  #[serde(default)]
  pub respawn_timer: f64,
  #[serde(default)]
  pub runes: RuneSummary,
  #[serde(default)]
  pub scores: Scores,
  #[serde(rename = "skinID", default)]
  pub skin_id: i64,
  #[serde(default)]
  pub summoner_name: String,
  #[serde(default)]
  pub riot_id: Option<String>,
  #[serde(default)]
  pub summoner_spells: SummonerSpells,
  #[serde(default)]
  pub team: Team,
  /// Only set on the local player's entry.
  #[serde(skip)]
  pub active: Option<ActivePlayerDetails>,
}

impl Player {
  /// Summoner name, or the Riot ID on clients that no longer send one.
  pub fn display_name(&self) -> &str {
    display_name(&self.summoner_name, self.riot_id.as_deref())
  }

  pub fn is_local(&self) -> bool {
    self.active.is_some()
  }

  /// (keystone, primary tree, secondary tree) display names.
  pub fn rune_names(&self) -> (&str, &str, &str) {
    (
      &self.runes.keystone.display_name,
      &self.runes.primary_rune_tree.display_name,
      &self.runes.secondary_rune_tree.display_name,
    )
  }

  pub fn summoner_spell_names(&self) -> (&str, &str) {
    (
      &self.summoner_spells.summoner_spell_one.display_name,
      &self.summoner_spells.summoner_spell_two.display_name,
    )
  }
}

fn display_name<'a>(summoner_name: &'a str, riot_id: Option<&'a str>) -> &'a str {
  match riot_id {
    Some(id) if summoner_name.is_empty() => id,
    _ => summoner_name,
  }
}

/// One entry of the append-only match event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
  #[serde(rename = "EventID")]
  pub id: i64,
  #[serde(rename = "EventName")]
  pub kind: String,
  #[serde(rename = "EventTime", default)]
  pub time: f64,
  /// Event specific fields (KillerName, VictimName, Assisters, ...).
  #[serde(flatten)]
  pub payload: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EventFeed {
  #[serde(rename = "Events", default)]
  pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
  #[serde(default)]
  pub game_mode: String,
  #[serde(default)]
  pub game_time: f64,
  #[serde(default)]
  pub map_name: String,
  #[serde(default)]
  pub map_number: i64,
  #[serde(default)]
  pub map_terrain: String,
}
