use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// Static catalog tables derived from a Data Dragon release

/// Boots must cost more than this to count (filters out the basic boots).
pub const BOOTS_PRICE_FLOOR: i64 = 300;
/// Non-mythic items must cost more than this to count as legendary.
pub const LEGENDARY_PRICE_FLOOR: i64 = 2000;
pub const MYTHIC_MARKER: &str = "Mythic";
pub const BOOTS_TAG: &str = "Boots";
/// Offense, flex and defense rows.
pub const STAT_MOD_SLOT_COUNT: usize = 3;

/// A champion, item, rune or stat mod: display name, numeric id and image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub name: String,
  pub id: i64,
  pub image: String,
}

impl CatalogEntry {
  pub fn new(name: impl Into<String>, id: i64, image: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      id,
      image: image.into(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTables {
  pub boots: Vec<CatalogEntry>,
  pub mythic: Vec<CatalogEntry>,
  pub legendary: Vec<CatalogEntry>,
}

/// A rune style with its keystone row and the three minor rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuneTree {
  pub id: i64,
  pub name: String,
  pub keystones: Vec<CatalogEntry>,
  pub slot1: Vec<CatalogEntry>,
  pub slot2: Vec<CatalogEntry>,
  pub slot3: Vec<CatalogEntry>,
}

impl RuneTree {
  /// Minor rows in tree order.
  pub fn slots(&self) -> [&[CatalogEntry]; 3] {
    [&self.slot1, &self.slot2, &self.slot3]
  }
}

fn stat_mod(name: &str, id: i64, image: &str) -> CatalogEntry {
  CatalogEntry::new(name, id, image)
}

// Offense, flex and defense rows of the stat shard grid
static STAT_MOD_SLOTS: Lazy<Vec<Vec<CatalogEntry>>> = Lazy::new(|| {
  let adaptive = stat_mod("Adaptive Force", 5008, "StatModsAdaptiveForceIcon.png");
  let attack_speed = stat_mod("Attack Speed", 5005, "StatModsAttackSpeedIcon.png");
  let cdr = stat_mod("Scaling CDR", 5007, "StatModsCDRScalingIcon.png");
  let armor = stat_mod("Armor", 5002, "StatModsArmorIcon.png");
  let magic_resist = stat_mod("Magic Resist", 5003, "StatModsMagicResIcon.png");
  let health = stat_mod("Health", 5001, "StatModsHealthScalingIcon.png");

  vec![
    vec![adaptive.clone(), attack_speed, cdr],
    vec![adaptive, magic_resist.clone(), armor.clone()],
    vec![health, magic_resist, armor],
  ]
});

pub fn stat_mod_slots() -> Vec<Vec<CatalogEntry>> {
  STAT_MOD_SLOTS.clone()
}

/// Everything the build generator needs, for one catalog version.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
  pub version: String,
  pub champions: Vec<CatalogEntry>,
  pub items: ItemTables,
  pub runes: Vec<RuneTree>,
  pub stat_mods: Vec<Vec<CatalogEntry>>,
}

impl Catalog {
  /// Derive all tables from the raw `champion.json`, `item.json` and `runesReforged.json`.
  pub fn from_raw(version: &str, champion_json: &Value, item_json: &Value, runes_json: &Value) -> Result<Self> {
    let catalog = Self {
      version: version.to_string(),
      champions: parse_champions(champion_json)?,
      items: parse_items(item_json)?,
      runes: parse_runes(runes_json)?,
      stat_mods: stat_mod_slots(),
    };
    tracing::info!(
      "Catalog {}: {} champions, {} boots, {} mythic, {} legendary, {} rune trees",
      version,
      catalog.champions.len(),
      catalog.items.boots.len(),
      catalog.items.mythic.len(),
      catalog.items.legendary.len(),
      catalog.runes.len()
    );
    Ok(catalog)
  }

  pub fn champion(&self, id: i64) -> Option<&CatalogEntry> {
    self.champions.iter().find(|c| c.id == id)
  }

  pub fn champion_by_name(&self, name: &str) -> Option<&CatalogEntry> {
    self.champions.iter().find(|c| c.name.eq_ignore_ascii_case(name))
  }

  pub fn champion_ids(&self) -> Vec<i64> {
    self.champions.iter().map(|c| c.id).collect()
  }

  pub fn rune_tree(&self, name: &str) -> Option<&RuneTree> {
    self.runes.iter().find(|t| t.name == name)
  }

  /// One non-empty row per stat shard slot, as a full rune page needs.
  pub fn has_stat_grid(&self) -> bool {
    self.stat_mods.len() == STAT_MOD_SLOT_COUNT && self.stat_mods.iter().all(|row| !row.is_empty())
  }
}

fn data_map<'a>(raw: &'a Value, file: &str) -> Result<&'a serde_json::Map<String, Value>> {
  raw
    .get("data")
    .and_then(Value::as_object)
    .ok_or_else(|| Error::Catalog(format!("{} has no data object", file)))
}

fn str_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
  value.get(field).and_then(Value::as_str)
}

fn image_file(value: &Value) -> String {
  value
    .get("image")
    .and_then(|img| img.get("full"))
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string()
}

/// Champions keyed by their numeric `key`, sorted by id.
pub fn parse_champions(raw: &Value) -> Result<Vec<CatalogEntry>> {
  let mut champions = Vec::new();
  for (slug, champion) in data_map(raw, "champion.json")? {
    let id = str_field(champion, "key")
      .and_then(|key| key.parse::<i64>().ok())
      .ok_or_else(|| Error::Catalog(format!("champion {} has no numeric key", slug)))?;
    let name = str_field(champion, "name").unwrap_or(slug);
    champions.push(CatalogEntry::new(name, id, image_file(champion)));
  }
  champions.sort_by_key(|c| c.id);
  Ok(champions)
}

/// Sort items into boots, mythic and legendary. Boots never count as legendary.
pub fn parse_items(raw: &Value) -> Result<ItemTables> {
  let mut tables = ItemTables::default();
  for (key, item) in data_map(raw, "item.json")? {
    let Ok(id) = key.parse::<i64>() else {
      tracing::debug!("Skipping item with non-numeric id {}", key);
      continue;
    };
    let gold = item.get("gold");
    if gold.and_then(|g| g.get("purchasable")).and_then(Value::as_bool) == Some(false) {
      continue;
    }
    let total = gold.and_then(|g| g.get("total")).and_then(Value::as_i64).unwrap_or(0);
    let description = str_field(item, "description").unwrap_or_default();
    let is_boots = item
      .get("tags")
      .and_then(Value::as_array)
      .map(|tags| tags.iter().any(|t| t.as_str() == Some(BOOTS_TAG)))
      .unwrap_or(false);

    let entry = CatalogEntry::new(str_field(item, "name").unwrap_or(key), id, image_file(item));
    let is_mythic = description.contains(MYTHIC_MARKER);
    if is_mythic {
      tables.mythic.push(entry.clone());
    } else if !is_boots && total > LEGENDARY_PRICE_FLOOR {
      tables.legendary.push(entry.clone());
    }
    if is_boots && total > BOOTS_PRICE_FLOOR {
      tables.boots.push(entry);
    }
  }

  for table in [&mut tables.boots, &mut tables.mythic, &mut tables.legendary] {
    table.sort_by_key(|e| e.id);
  }
  Ok(tables)
}

fn rune_entries(row: &Value) -> Vec<CatalogEntry> {
  row
    .get("runes")
    .and_then(Value::as_array)
    .map(|runes| {
      runes
        .iter()
        .filter_map(|rune| {
          let id = rune.get("id").and_then(Value::as_i64)?;
          let name = str_field(rune, "name").unwrap_or_default();
          let icon = str_field(rune, "icon").unwrap_or_default();
          Some(CatalogEntry::new(name, id, icon))
        })
        .collect()
    })
    .unwrap_or_default()
}

/// Rune trees in file order. Row 0 holds the keystones, rows 1 to 3 the minor runes.
pub fn parse_runes(raw: &Value) -> Result<Vec<RuneTree>> {
  let trees = raw
    .as_array()
    .ok_or_else(|| Error::Catalog("runesReforged.json is not an array".to_string()))?;

  trees
    .iter()
    .map(|tree| {
      let id = tree
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::Catalog("rune tree without id".to_string()))?;
      let name = str_field(tree, "name").unwrap_or_default().to_string();
      let rows: Vec<Vec<CatalogEntry>> = tree
        .get("slots")
        .and_then(Value::as_array)
        .map(|slots| slots.iter().map(rune_entries).collect())
        .unwrap_or_default();

      let mut rows = rows.into_iter();
      let mut next_row = || rows.next().unwrap_or_default();
      Ok(RuneTree {
        id,
        name,
        keystones: next_row(),
        slot1: next_row(),
        slot2: next_row(),
        slot3: next_row(),
      })
    })
    .collect()
}
