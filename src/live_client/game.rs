// Live match poller: roster and incremental event feed of the running game

use reqwest::Method;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;

use super::types::{ActivePlayerDetails, EventFeed, GameEvent, GameStats, Player};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lcu::transport::{HttpTransport, Transport};

pub const PLAYER_LIST_PATH: &str = "/liveclientdata/playerlist";
pub const ACTIVE_PLAYER_PATH: &str = "/liveclientdata/activeplayer";
pub const EVENT_DATA_PATH: &str = "/liveclientdata/eventdata";
pub const GAME_STATS_PATH: &str = "/liveclientdata/gamestats";

/// Caller-driven poller. Nothing runs in the background; call `poll_*` in your own loop.
pub struct LiveClient {
  transport: Arc<dyn Transport>,
  seen_event_ids: HashSet<i64>,
  events: Vec<GameEvent>,
  players: Vec<Player>,
}

impl LiveClient {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      seen_event_ids: HashSet::new(),
      events: Vec::new(),
      players: Vec::new(),
    }
  }

  /// Poller for the game on `config.live_client_port`. The game API takes no credentials.
  pub fn connect(config: &Config) -> Result<Self> {
    let transport = HttpTransport::new(
      config.live_client_port,
      None,
      &config.user_agent,
      config.request_timeout(),
      config.accept_invalid_certs,
    )?;
    Ok(Self::new(Arc::new(transport)))
  }

  /// True only while a match is running. Never fails.
  pub async fn is_match_active(&self) -> bool {
    match self.transport.send(Method::GET, PLAYER_LIST_PATH, None).await {
      Ok(response) if response.is_success() => {
        matches!(
          serde_json::from_str::<serde_json::Value>(&response.body),
          Ok(serde_json::Value::Array(_))
        )
      }
      Ok(response) => {
        tracing::debug!("Live client answered {} - no match running", response.status);
        false
      }
      Err(e) => {
        tracing::debug!("Live client unreachable: {}", e);
        false
      }
    }
  }

  async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
    let response = self
      .transport
      .send(Method::GET, path, None)
      .await?
      .error_for_status(operation)?;
    response.json().map_err(|e| Error::Transport {
      operation: operation.to_string(),
      status: Some(response.status),
      message: format!("unexpected response body: {}", e),
    })
  }

  /// Fetch the event feed and return the events not seen on the previous poll, in feed order.
  pub async fn poll_events(&mut self) -> Result<Vec<GameEvent>> {
    let feed: EventFeed = self.get_json("get game events", EVENT_DATA_PATH).await?;
    let new_events = reconcile_events(&mut self.seen_event_ids, &feed.events);
    if !new_events.is_empty() {
      tracing::info!("{} new game event(s)", new_events.len());
    }
    self.events = feed.events;
    Ok(new_events)
  }

  /// Rebuild the roster and attach the local player's extended state to its entry.
  pub async fn poll_roster(&mut self) -> Result<&[Player]> {
    let players: Vec<Player> = self.get_json("get player list", PLAYER_LIST_PATH).await?;
    let active: ActivePlayerDetails = self.get_json("get active player", ACTIVE_PLAYER_PATH).await?;

    self.players = attach_active_player(players, active);
    Ok(&self.players)
  }

  pub async fn game_stats(&self) -> Result<GameStats> {
    self.get_json("get game stats", GAME_STATS_PATH).await
  }

  /// Full event log as of the last poll.
  pub fn events(&self) -> &[GameEvent] {
    &self.events
  }

  /// Most recent event, `None` before the first event.
  pub fn last_event(&self) -> Option<&GameEvent> {
    self.events.last()
  }

  pub fn players(&self) -> &[Player] {
    &self.players
  }

  pub fn active_player(&self) -> Option<&Player> {
    self.players.iter().find(|p| p.is_local())
  }

  pub fn is_player_present(&self, name: &str) -> bool {
    self.players.iter().any(|p| p.display_name() == name)
  }

  pub fn champion_name(&self, name: &str) -> Result<&str> {
    self
      .players
      .iter()
      .find(|p| p.display_name() == name)
      .map(|p| p.champion_name.as_str())
      .ok_or_else(|| Error::PlayerNotFound(name.to_string()))
  }
}

/// Events of `feed` whose id is not in `seen`; `seen` becomes the ids of the whole feed.
pub fn reconcile_events(seen: &mut HashSet<i64>, feed: &[GameEvent]) -> Vec<GameEvent> {
  let new_events: Vec<GameEvent> = feed
    .iter()
    .filter(|event| !seen.contains(&event.id))
    .cloned()
    .collect();
  *seen = feed.iter().map(|event| event.id).collect();
  new_events
}

/// Mark the roster entry whose name matches the active player as local.
pub fn attach_active_player(mut players: Vec<Player>, active: ActivePlayerDetails) -> Vec<Player> {
  let local_name = active.display_name().to_string();
  match players.iter_mut().find(|p| p.display_name() == local_name) {
    Some(player) => player.active = Some(active),
    // Spectators get a roster without themselves in it
    None => tracing::debug!("Active player {:?} not in roster", local_name),
  }
  players
}
