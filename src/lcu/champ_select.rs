// Champ select: phase detection, locating our own action, hover + lock-in

use reqwest::Method;
use serde_json::json;

use super::client::LcuClient;
use super::transport::ApiResponse;
use super::types::{ChampSelectAction, ChampSelectSession, GameflowPhase};
use crate::error::{Error, Result};

impl LcuClient {
  pub async fn get_phase(&self) -> Result<GameflowPhase> {
    let operation = "get gameflow phase";
    let response = self
      .request(Method::GET, "/lol-gameflow/v1/gameflow-phase", None)
      .await?
      .error_for_status(operation)?;
    Ok(GameflowPhase::parse(&response.body))
  }

  pub async fn get_full_selection_state(&self) -> Result<ChampSelectSession> {
    self
      .get_json("get champ select session", "/lol-champ-select/v1/session")
      .await
  }

  /// Champion ids the local player may pick right now.
  pub async fn pickable_champion_ids(&self) -> Result<Vec<i64>> {
    self
      .get_json(
        "get pickable champions",
        "/lol-champ-select/v1/pickable-champion-ids",
      )
      .await
  }

  /// All champ select actions owned by the current summoner's cell.
  pub async fn get_own_pending_actions(&self) -> Result<Vec<ChampSelectAction>> {
    let summoner = self.current_summoner().await?;
    let session = self.get_full_selection_state().await?;
    Ok(own_actions(&session, summoner.summoner_id))
  }

  /// Hover `champion_id` on our running action, then lock it in.
  ///
  /// A failed lock-in after a successful hover is reported as `PartialCommit`;
  /// retry it with [`LcuClient::complete_action`].
  pub async fn commit(&self, champion_id: i64) -> Result<ChampSelectAction> {
    let actions = self.get_own_pending_actions().await?;
    let action = select_committable_action(&actions)?.clone();

    let path = format!("/lol-champ-select/v1/session/actions/{}", action.id);
    self
      .write(
        "hover champion",
        Method::PATCH,
        &path,
        Some(json!({ "championId": champion_id })),
      )
      .await?;
    tracing::debug!("Hovered champion {} on action {}", champion_id, action.id);

    if let Err(e) = self.complete_action(action.id).await {
      tracing::warn!(
        "Champion {} hovered on action {} but lock-in failed: {}",
        champion_id,
        action.id,
        e
      );
      return Err(Error::PartialCommit {
        action_id: action.id,
        source: Box::new(e),
      });
    }

    tracing::info!("Locked in champion {} (action {})", champion_id, action.id);
    Ok(ChampSelectAction {
      champion_id,
      completed: true,
      ..action
    })
  }

  /// Lock in whatever is hovered on `action_id`.
  pub async fn complete_action(&self, action_id: i64) -> Result<ApiResponse> {
    let path = format!("/lol-champ-select/v1/session/actions/{}/complete", action_id);
    self.write("lock in champion", Method::POST, &path, None).await
  }
}

/// Actions whose actor is the team cell owned by `summoner_id`. Empty when we are not on the roster.
pub fn own_actions(session: &ChampSelectSession, summoner_id: i64) -> Vec<ChampSelectAction> {
  let Some(cell_id) = session
    .my_team
    .iter()
    .find(|member| member.summoner_id == summoner_id)
    .map(|member| member.cell_id)
  else {
    tracing::debug!("Summoner {} not found on my team", summoner_id);
    return Vec::new();
  };

  session
    .all_actions()
    .filter(|action| action.actor_cell_id == cell_id)
    .cloned()
    .collect()
}

/// The single action we can act on now. Zero or several candidates is a conflict.
pub fn select_committable_action(actions: &[ChampSelectAction]) -> Result<&ChampSelectAction> {
  let mut candidates = actions.iter().filter(|a| a.is_committable());
  match (candidates.next(), candidates.next()) {
    (Some(action), None) => Ok(action),
    (None, _) => Err(Error::StateConflict(
      "no in-progress action of ours to commit".to_string(),
    )),
    (Some(first), Some(second)) => Err(Error::StateConflict(format!(
      "several in-progress actions of ours ({}, {}, ...); refusing to guess",
      first.id, second.id
    ))),
  }
}
