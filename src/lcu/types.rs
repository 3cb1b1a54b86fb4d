use serde::{Deserialize, Serialize};
use std::fmt;

// Data structures for LCU endpoints

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentSummoner {
  pub summoner_id: i64,
  pub display_name: String,
  pub puuid: Option<String>,
}

impl CurrentSummoner {
  /// Build from `/lol-summoner/v1/current-summoner`, trying several name fields.
  pub fn from_json(summoner_data: &serde_json::Value) -> Option<Self> {
    let summoner_id = summoner_data.get("summonerId").and_then(|v| v.as_i64())?;

    let field = |name: &str| {
      summoner_data
        .get(name)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
    };

    let display_name = field("displayName");
    let game_name = field("gameName");
    let tag_line = {
      let tag = field("tagLine");
      if tag.is_empty() {
        field("gameTag")
      } else {
        tag
      }
    };

    let display_name = if !display_name.is_empty() {
      display_name
    } else if !game_name.is_empty() && !tag_line.is_empty() {
      format!("{}#{}", game_name, tag_line)
    } else if !game_name.is_empty() {
      game_name
    } else {
      format!("User{}", summoner_id)
    };

    let puuid = Some(field("puuid")).filter(|p| !p.is_empty());

    Some(Self {
      summoner_id,
      display_name,
      puuid,
    })
  }
}

/// A rune page as returned by `/lol-perks/v1/pages`.
///
/// Unknown fields are kept so a read-modify-write does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkPage {
  pub id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub primary_style_id: i64,
  #[serde(default)]
  pub sub_style_id: i64,
  #[serde(default)]
  pub selected_perk_ids: Vec<i64>,
  #[serde(default)]
  pub is_editable: bool,
  #[serde(default)]
  pub is_deletable: bool,
  #[serde(default)]
  pub is_active: bool,
  #[serde(default)]
  pub current: bool,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Number of perk ids on a full page: keystone, 3 primary, 2 secondary, 3 stat shards.
pub const PERK_PAGE_SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameflowPhase {
  None,
  Lobby,
  Matchmaking,
  ReadyCheck,
  ChampSelect,
  GameStart,
  InProgress,
  Reconnect,
  WaitingForStats,
  PreEndOfGame,
  EndOfGame,
  Other(String),
}

impl GameflowPhase {
  pub fn parse(raw: &str) -> Self {
    match raw.trim().trim_matches('"') {
      "None" | "" => Self::None,
      "Lobby" => Self::Lobby,
      "Matchmaking" => Self::Matchmaking,
      "ReadyCheck" => Self::ReadyCheck,
      "ChampSelect" => Self::ChampSelect,
      "GameStart" => Self::GameStart,
      "InProgress" => Self::InProgress,
      "Reconnect" => Self::Reconnect,
      "WaitingForStats" => Self::WaitingForStats,
      "PreEndOfGame" => Self::PreEndOfGame,
      "EndOfGame" => Self::EndOfGame,
      other => Self::Other(other.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::None => "None",
      Self::Lobby => "Lobby",
      Self::Matchmaking => "Matchmaking",
      Self::ReadyCheck => "ReadyCheck",
      Self::ChampSelect => "ChampSelect",
      Self::GameStart => "GameStart",
      Self::InProgress => "InProgress",
      Self::Reconnect => "Reconnect",
      Self::WaitingForStats => "WaitingForStats",
      Self::PreEndOfGame => "PreEndOfGame",
      Self::EndOfGame => "EndOfGame",
      Self::Other(s) => s,
    }
  }
}

impl fmt::Display for GameflowPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// `/lol-champ-select/v1/session`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampSelectSession {
  #[serde(default)]
  pub local_player_cell_id: i64,
  /// Turns, each a group of actions taken at the same time.
  #[serde(default)]
  pub actions: Vec<Vec<ChampSelectAction>>,
  #[serde(default)]
  pub my_team: Vec<TeamMember>,
  #[serde(default)]
  pub their_team: Vec<TeamMember>,
}

impl ChampSelectSession {
  pub fn all_actions(&self) -> impl Iterator<Item = &ChampSelectAction> {
    self.actions.iter().flatten()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampSelectAction {
  pub id: i64,
  pub actor_cell_id: i64,
  #[serde(default)]
  pub champion_id: i64,
  #[serde(default)]
  pub completed: bool,
  #[serde(default)]
  pub is_ally_action: bool,
  #[serde(default)]
  pub is_in_progress: bool,
  #[serde(default, rename = "type")]
  pub action_type: String,
}

impl ChampSelectAction {
  /// Our side's action whose turn is running and that has not been locked yet.
  pub fn is_committable(&self) -> bool {
    self.is_ally_action && self.is_in_progress && !self.completed
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
  pub cell_id: i64,
  #[serde(default)]
  pub summoner_id: i64,
  #[serde(default)]
  pub champion_id: i64,
  #[serde(default)]
  pub champion_pick_intent: i64,
  #[serde(default)]
  pub spell1_id: i64,
  #[serde(default)]
  pub spell2_id: i64,
  #[serde(default)]
  pub assigned_position: String,
}
