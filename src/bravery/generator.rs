// Ultimate Bravery: a random champion, item set and rune page

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use super::catalog::{Catalog, CatalogEntry, RuneTree, STAT_MOD_SLOT_COUNT};
use crate::error::{Error, Result};

/// Champion that cannot buy boots and gets an extra legendary instead.
pub const NO_BOOTS_CHAMPION: &str = "Cassiopeia";
pub const LEGENDARY_COUNT: usize = 4;

/// Id and name of a rune style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuneStyle {
  pub id: i64,
  pub name: String,
}

impl From<&RuneTree> for RuneStyle {
  fn from(tree: &RuneTree) -> Self {
    Self {
      id: tree.id,
      name: tree.name.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Build {
  pub champion: CatalogEntry,
  /// `None` only for the champion that cannot buy boots.
  pub boots: Option<CatalogEntry>,
  pub mythic: CatalogEntry,
  pub legendaries: Vec<CatalogEntry>,
  pub primary_style: RuneStyle,
  pub keystone: CatalogEntry,
  /// One rune from each minor row of the primary tree.
  pub primary_runes: Vec<CatalogEntry>,
  pub secondary_style: RuneStyle,
  /// Runes from two different minor rows of the secondary tree, in row order.
  pub secondary_runes: Vec<CatalogEntry>,
  pub stat_mods: Vec<CatalogEntry>,
}

impl Build {
  /// Boots (if any), mythic, then the legendaries.
  pub fn items(&self) -> Vec<&CatalogEntry> {
    self
      .boots
      .iter()
      .chain(std::iter::once(&self.mythic))
      .chain(self.legendaries.iter())
      .collect()
  }

  /// The 9 perk ids in rune page order: keystone, primary runes, secondary runes, stat mods.
  pub fn perk_ids(&self) -> Vec<i64> {
    std::iter::once(&self.keystone)
      .chain(&self.primary_runes)
      .chain(&self.secondary_runes)
      .chain(&self.stat_mods)
      .map(|rune| rune.id)
      .collect()
  }

  pub fn primary_style_id(&self) -> i64 {
    self.primary_style.id
  }

  pub fn sub_style_id(&self) -> i64 {
    self.secondary_style.id
  }

  /// Name for the rune page this build gets applied to.
  pub fn page_name(&self) -> String {
    format!("Bravery: {}", self.champion.name)
  }
}

fn names(entries: &[CatalogEntry]) -> String {
  entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Build {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let div = "----------";
    let items: Vec<&str> = self.items().iter().map(|i| i.name.as_str()).collect();

    writeln!(f, "Ultimate Bravery")?;
    writeln!(f, "{}", div)?;
    writeln!(f, "Champion")?;
    writeln!(f, "{}", div)?;
    writeln!(f, "{}", self.champion.name)?;
    writeln!(f)?;
    writeln!(f, "Item Set")?;
    writeln!(f, "{}", div)?;
    writeln!(f, "{}", items.join(", "))?;
    writeln!(f)?;
    writeln!(f, "Rune Page")?;
    writeln!(f, "{}", div)?;
    writeln!(
      f,
      "Primary: {} - {}: {}",
      self.primary_style.name,
      self.keystone.name,
      names(&self.primary_runes)
    )?;
    writeln!(
      f,
      "Secondary: {}: {}",
      self.secondary_style.name,
      names(&self.secondary_runes)
    )?;
    write!(f, "Stat Mods: {}", names(&self.stat_mods))
  }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &'a [CatalogEntry], what: &str) -> Result<&'a CatalogEntry> {
  pool
    .choose(rng)
    .ok_or_else(|| Error::Catalog(format!("no {} to choose from", what)))
}

/// Two different indices below `len`, each ordered pair equally likely.
fn two_distinct<R: Rng + ?Sized>(rng: &mut R, len: usize) -> (usize, usize) {
  let first = rng.gen_range(0..len);
  let mut second = rng.gen_range(0..len - 1);
  if second >= first {
    second += 1;
  }
  (first, second)
}

/// Roll a build for one of `selectable_ids`. All choices are uniform.
///
/// The secondary tree contributes runes from two distinct minor rows chosen at random,
/// not always the first two. Legendaries never include boots, so a build carries
/// at most one pair of boots.
pub fn generate<R: Rng + ?Sized>(selectable_ids: &[i64], catalog: &Catalog, rng: &mut R) -> Result<Build> {
  let champion_id = *selectable_ids
    .choose(rng)
    .ok_or_else(|| Error::Validation("No selectable champions".to_string()))?;
  let champion = catalog
    .champion(champion_id)
    .ok_or_else(|| {
      Error::Catalog(format!(
        "champion {} is not in catalog {}",
        champion_id, catalog.version
      ))
    })?
    .clone();

  let no_boots = champion.name == NO_BOOTS_CHAMPION;
  let boots = if no_boots {
    None
  } else {
    Some(pick(rng, &catalog.items.boots, "boots")?.clone())
  };
  let mythic = pick(rng, &catalog.items.mythic, "mythic items")?.clone();

  let legendary_count = if no_boots { LEGENDARY_COUNT + 1 } else { LEGENDARY_COUNT };
  let legendary_pool: Vec<&CatalogEntry> = catalog
    .items
    .legendary
    .iter()
    .filter(|item| !catalog.items.boots.contains(*item))
    .collect();
  if legendary_pool.len() < legendary_count {
    return Err(Error::Catalog(format!(
      "need {} legendary items, catalog {} has {}",
      legendary_count,
      catalog.version,
      legendary_pool.len()
    )));
  }
  let legendaries: Vec<CatalogEntry> = legendary_pool
    .choose_multiple(rng, legendary_count)
    .map(|item| (*item).clone())
    .collect();

  if catalog.runes.len() < 2 {
    return Err(Error::Catalog(format!(
      "need 2 rune trees, catalog {} has {}",
      catalog.version,
      catalog.runes.len()
    )));
  }
  let (primary, secondary) = two_distinct(rng, catalog.runes.len());
  let primary = &catalog.runes[primary];
  let secondary = &catalog.runes[secondary];

  let keystone = pick(rng, &primary.keystones, "keystones")?.clone();
  let primary_runes = primary
    .slots()
    .into_iter()
    .map(|row| pick(rng, row, "primary runes").cloned())
    .collect::<Result<Vec<_>>>()?;

  let (a, b) = two_distinct(rng, 3);
  let rows = secondary.slots();
  let secondary_runes = [a.min(b), a.max(b)]
    .into_iter()
    .map(|row| pick(rng, rows[row], "secondary runes").cloned())
    .collect::<Result<Vec<_>>>()?;

  if !catalog.has_stat_grid() {
    return Err(Error::Catalog(format!(
      "catalog {} needs {} stat mod rows, has {}",
      catalog.version,
      STAT_MOD_SLOT_COUNT,
      catalog.stat_mods.len()
    )));
  }
  let stat_mods = catalog
    .stat_mods
    .iter()
    .map(|slot| pick(rng, slot, "stat mods").cloned())
    .collect::<Result<Vec<_>>>()?;

  let build = Build {
    champion,
    boots,
    mythic,
    legendaries,
    primary_style: primary.into(),
    keystone,
    primary_runes,
    secondary_style: secondary.into(),
    secondary_runes,
    stat_mods,
  };
  tracing::debug!("Rolled {} with {:?}", build.champion.name, build.perk_ids());
  Ok(build)
}
