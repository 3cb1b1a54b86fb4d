// Rune pages and summoner spells

use reqwest::Method;
use serde_json::json;

use super::client::LcuClient;
use super::transport::ApiResponse;
use super::types::{PerkPage, PERK_PAGE_SIZE};
use crate::error::{Error, Result};

impl LcuClient {
  /// Every rune page of the current summoner, default pages included.
  pub async fn get_all_pages(&self) -> Result<Vec<PerkPage>> {
    self.get_json("get rune pages", "/lol-perks/v1/pages").await
  }

  pub async fn get_active_page(&self) -> Result<PerkPage> {
    self.get_json("get current rune page", "/lol-perks/v1/currentpage").await
  }

  /// Overwrite the active page with a new name, styles and 9 perk ids.
  pub async fn set_active_page(
    &self,
    name: &str,
    primary_style_id: i64,
    perk_ids: &[i64],
    sub_style_id: i64,
  ) -> Result<ApiResponse> {
    if perk_ids.len() != PERK_PAGE_SIZE {
      return Err(Error::Validation(format!(
        "A rune page needs exactly {} perk ids, got {}",
        PERK_PAGE_SIZE,
        perk_ids.len()
      )));
    }
    if name.trim().is_empty() {
      return Err(Error::Validation("Rune page name must not be empty".to_string()));
    }

    let mut page = self.get_active_page().await?;
    if !page.is_editable {
      return Err(Error::Validation(format!(
        "Active rune page {:?} ({}) is not editable",
        page.name, page.id
      )));
    }

    page.name = name.to_string();
    page.primary_style_id = primary_style_id;
    page.sub_style_id = sub_style_id;
    page.selected_perk_ids = perk_ids.to_vec();

    let path = format!("/lol-perks/v1/pages/{}", page.id);
    let body = serde_json::to_value(&page)?;
    let response = self.write("update rune page", Method::PUT, &path, Some(body)).await?;
    tracing::info!("Rune page {} updated to {:?}", page.id, name);
    Ok(response)
  }

  /// Pick both summoner spells for the current champ select.
  pub async fn set_summoner_spells(&self, spell1_id: i64, spell2_id: i64) -> Result<ApiResponse> {
    if spell1_id == spell2_id {
      return Err(Error::Validation(format!(
        "Summoner spells must differ, got {} twice",
        spell1_id
      )));
    }
    let body = json!({ "spell1Id": spell1_id, "spell2Id": spell2_id });
    self
      .write(
        "set summoner spells",
        Method::PATCH,
        "/lol-champ-select/v1/session/my-selection",
        Some(body),
      )
      .await
  }
}
