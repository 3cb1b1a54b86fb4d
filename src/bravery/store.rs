// Versioned on-disk cache of Data Dragon catalog tables

use async_trait::async_trait;
use flate2::read::GzDecoder;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;

use super::catalog::{Catalog, CatalogEntry, ItemTables, RuneTree};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lcu::transport::classify;

pub const CHAMPIONS_FILE: &str = "champions.json";
pub const ITEMS_FILE: &str = "items.json";
pub const RUNES_FILE: &str = "runes.json";
pub const STAT_MODS_FILE: &str = "stat_mods.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const DOWNLOAD_TIMEOUT_SECS: u64 = 600;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where catalog releases come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
  /// Newest published version tag.
  async fn latest_version(&self) -> Result<String>;

  /// Write the release archive for `version` to `dest`.
  async fn download_archive(&self, version: &str, dest: &Path) -> Result<()>;
}

/// Data Dragon CDN: `/api/versions.json` and `/cdn/dragontail-{version}.tgz`.
pub struct DataDragonSource {
  client: reqwest::Client,
  base_url: String,
}

impl DataDragonSource {
  pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(user_agent)
      .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
      .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
      .build()
      .map_err(|e| Error::Connection(format!("Failed to build HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  pub fn from_config(config: &Config) -> Result<Self> {
    Self::new(&config.ddragon_base_url, &config.user_agent)
  }

  pub fn versions_url(&self) -> String {
    format!("{}/api/versions.json", self.base_url)
  }

  pub fn archive_url(&self, version: &str) -> String {
    format!("{}/cdn/dragontail-{}.tgz", self.base_url, version)
  }
}

#[async_trait]
impl CatalogSource for DataDragonSource {
  async fn latest_version(&self) -> Result<String> {
    let operation = "fetch catalog versions";
    let response = self
      .client
      .get(self.versions_url())
      .send()
      .await
      .map_err(|e| classify(operation, e))?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
      return Err(Error::Transport {
        operation: operation.to_string(),
        status: Some(status),
        message: "version index unavailable".to_string(),
      });
    }

    let versions: Vec<String> = response.json().await.map_err(|e| classify(operation, e))?;
    versions
      .into_iter()
      .next()
      .ok_or_else(|| Error::Catalog("version index is empty".to_string()))
  }

  async fn download_archive(&self, version: &str, dest: &Path) -> Result<()> {
    let operation = format!("download catalog {}", version);
    let url = self.archive_url(version);
    tracing::info!("Downloading {}", url);

    let response = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| classify(&operation, e))?;
    if !response.status().is_success() {
      return Err(Error::Transport {
        operation,
        status: Some(response.status().as_u16()),
        message: format!("GET {} was rejected", url),
      });
    }

    // Stream into a sibling temp file so an interrupted download never looks complete
    let partial = dest.with_extension("part");
    let file = async_fs::File::create(&partial).await?;
    let mut file = tokio::io::BufWriter::with_capacity(256 * 1024, file);

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
      let bytes = chunk.map_err(|e| classify(&operation, e))?;
      file.write_all(&bytes).await?;
      downloaded += bytes.len() as u64;
    }
    file.flush().await?;
    drop(file);

    async_fs::rename(&partial, dest).await?;
    tracing::info!("Downloaded {} ({} bytes)", url, downloaded);
    Ok(())
  }
}

/// Written next to the derived tables; a cache dir without it is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogManifest {
  pub version: String,
  pub locale: String,
  /// Unix seconds.
  pub fetched_at: i64,
}

/// Raw Data Dragon files pulled out of a release archive.
#[derive(Debug, Clone)]
pub struct RawCatalog {
  pub champion: Value,
  pub item: Value,
  pub runes: Value,
}

pub struct CatalogStore {
  source: Arc<dyn CatalogSource>,
  cache_dir: PathBuf,
  locale: String,
}

impl CatalogStore {
  pub fn new(source: Arc<dyn CatalogSource>, cache_dir: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
    Self {
      source,
      cache_dir: cache_dir.into(),
      locale: locale.into(),
    }
  }

  /// Store backed by Data Dragon and the configured cache directory.
  pub fn from_config(config: &Config) -> Result<Self> {
    let source = DataDragonSource::from_config(config)?;
    Ok(Self::new(
      Arc::new(source),
      config.resolved_cache_dir(),
      config.locale.clone(),
    ))
  }

  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  pub fn version_dir(&self, version: &str) -> PathBuf {
    self.cache_dir.join(version)
  }

  /// Catalog for `version`, or when `None` the newest cached catalog.
  ///
  /// The remote version index is only consulted when `version` is `None` and nothing is
  /// cached yet; use [`CatalogStore::refresh_catalog`] to pick up a new release.
  /// Cached tables are reused as is. Otherwise the tables are derived from the cached
  /// archive, downloading it first when needed. Caching a new version removes every
  /// other cached version.
  pub async fn ensure_catalog(&self, version: Option<&str>) -> Result<Catalog> {
    let version = match version {
      Some(v) => validate_version(v)?.to_string(),
      None => {
        if let Some(catalog) = self.newest_cached() {
          return Ok(catalog);
        }
        let latest = self.source.latest_version().await?;
        validate_version(&latest)?.to_string()
      }
    };
    self.catalog_for(&version).await
  }

  /// Catalog for the latest published version. Falls back to the newest cached catalog
  /// when the release cannot be fetched.
  pub async fn refresh_catalog(&self) -> Result<Catalog> {
    let fetched = match self.source.latest_version().await {
      Ok(latest) => self.catalog_for(validate_version(&latest)?).await,
      Err(e) => Err(e),
    };
    match fetched {
      Err(e @ (Error::Connection(_) | Error::Transport { .. } | Error::Timeout { .. })) => {
        match self.newest_cached() {
          Some(catalog) => {
            tracing::warn!("Catalog refresh failed, using cached {}: {}", catalog.version, e);
            Ok(catalog)
          }
          None => Err(e),
        }
      }
      other => other,
    }
  }

  async fn catalog_for(&self, version: &str) -> Result<Catalog> {
    let dir = self.version_dir(version);
    if let Some(catalog) = self.load_cached(version) {
      tracing::debug!("Catalog {} loaded from {}", version, dir.display());
      return Ok(catalog);
    }

    fs::create_dir_all(&dir)?;
    let archive = dir.join(archive_file_name(version));
    if !archive.exists() {
      self.source.download_archive(version, &archive).await?;
    }

    let raw = {
      let archive = archive.clone();
      let version = version.to_string();
      let locale = self.locale.clone();
      tokio::task::spawn_blocking(move || extract_catalog_files(&archive, &version, &locale))
        .await
        .map_err(|e| Error::Catalog(format!("archive extraction aborted: {}", e)))??
    };

    let catalog = Catalog::from_raw(version, &raw.champion, &raw.item, &raw.runes)?;
    self.write_tables(&dir, &catalog)?;
    self.prune_other_versions(version)?;
    Ok(catalog)
  }

  /// Most recently fetched cached catalog for this locale, if any is usable.
  pub fn newest_cached(&self) -> Option<Catalog> {
    let entries = fs::read_dir(&self.cache_dir).ok()?;
    let mut manifests: Vec<CatalogManifest> = entries
      .filter_map(|entry| entry.ok())
      .filter(|entry| entry.path().is_dir())
      .filter_map(|entry| read_json::<CatalogManifest>(&entry.path().join(MANIFEST_FILE)).ok())
      .filter(|manifest| manifest.locale == self.locale)
      .collect();
    manifests.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at).then_with(|| b.version.cmp(&a.version)));

    manifests
      .iter()
      .filter(|manifest| validate_version(&manifest.version).is_ok())
      .find_map(|manifest| self.load_cached(&manifest.version))
  }

  /// Derived tables for `version` if all of them are present, readable and complete.
  pub fn load_cached(&self, version: &str) -> Option<Catalog> {
    let dir = self.version_dir(version);
    let manifest: CatalogManifest = read_json(&dir.join(MANIFEST_FILE)).ok()?;
    if manifest.version != version || manifest.locale != self.locale {
      tracing::info!(
        "Cached catalog {} ({}) does not match {} ({}), rebuilding",
        manifest.version,
        manifest.locale,
        version,
        self.locale
      );
      return None;
    }

    let tables = (|| -> Result<Catalog> {
      Ok(Catalog {
        version: version.to_string(),
        champions: read_json::<Vec<CatalogEntry>>(&dir.join(CHAMPIONS_FILE))?,
        items: read_json::<ItemTables>(&dir.join(ITEMS_FILE))?,
        runes: read_json::<Vec<RuneTree>>(&dir.join(RUNES_FILE))?,
        stat_mods: read_json::<Vec<Vec<CatalogEntry>>>(&dir.join(STAT_MODS_FILE))?,
      })
    })();

    match tables {
      Ok(catalog) if catalog.has_stat_grid() => Some(catalog),
      Ok(catalog) => {
        tracing::warn!(
          "Cached catalog {} has {} stat mod rows, rebuilding",
          version,
          catalog.stat_mods.len()
        );
        None
      }
      Err(e) => {
        tracing::warn!("Cached catalog {} is unreadable, rebuilding: {}", version, e);
        None
      }
    }
  }

  fn write_tables(&self, dir: &Path, catalog: &Catalog) -> Result<()> {
    write_json(&dir.join(CHAMPIONS_FILE), &catalog.champions)?;
    write_json(&dir.join(ITEMS_FILE), &catalog.items)?;
    write_json(&dir.join(RUNES_FILE), &catalog.runes)?;
    write_json(&dir.join(STAT_MODS_FILE), &catalog.stat_mods)?;
    // Manifest goes last: it marks the directory as complete
    let manifest = CatalogManifest {
      version: catalog.version.clone(),
      locale: self.locale.clone(),
      fetched_at: chrono::Utc::now().timestamp(),
    };
    write_json(&dir.join(MANIFEST_FILE), &manifest)?;
    tracing::info!("Catalog {} cached in {}", catalog.version, dir.display());
    Ok(())
  }

  /// Remove cached versions other than `keep`. Only directories this store created are touched.
  fn prune_other_versions(&self, keep: &str) -> Result<()> {
    for entry in fs::read_dir(&self.cache_dir)? {
      let entry = entry?;
      let path = entry.path();
      if !path.is_dir() || entry.file_name().to_string_lossy() == keep {
        continue;
      }
      let name = entry.file_name().to_string_lossy().to_string();
      let owned = path.join(MANIFEST_FILE).exists() || path.join(archive_file_name(&name)).exists();
      if owned {
        tracing::info!("Removing stale catalog {}", path.display());
        fs::remove_dir_all(&path)?;
      }
    }
    Ok(())
  }
}

pub fn archive_file_name(version: &str) -> String {
  format!("dragontail-{}.tgz", version)
}

fn validate_version(version: &str) -> Result<&str> {
  let valid = !version.is_empty()
    && version != "."
    && version != ".."
    && version
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
  if valid {
    Ok(version)
  } else {
    Err(Error::Validation(format!("Invalid catalog version {:?}", version)))
  }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let content = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&content)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  let content = serde_json::to_string_pretty(value)?;
  fs::write(path, content)?;
  Ok(())
}

/// Read `champion.json`, `item.json` and `runesReforged.json` for `locale` out of a
/// `dragontail-{version}.tgz` without unpacking anything else.
pub fn extract_catalog_files(archive: &Path, version: &str, locale: &str) -> Result<RawCatalog> {
  let wanted = [
    format!("{}/data/{}/champion.json", version, locale),
    format!("{}/data/{}/item.json", version, locale),
    format!("{}/data/{}/runesReforged.json", version, locale),
  ];
  let mut found: [Option<Value>; 3] = [None, None, None];

  let file = fs::File::open(archive)?;
  let mut tarball = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
  for entry in tarball.entries()? {
    let mut entry = entry?;
    let path = entry.path()?.to_string_lossy().trim_start_matches("./").to_string();
    let Some(index) = wanted.iter().position(|w| *w == path) else {
      continue;
    };

    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    found[index] = Some(serde_json::from_str(&content)?);
    if found.iter().all(Option::is_some) {
      break;
    }
  }

  let [champion, item, runes] = found;
  let missing = |name: &str| Error::Catalog(format!("{} has no {}", archive.display(), name));
  Ok(RawCatalog {
    champion: champion.ok_or_else(|| missing(&wanted[0]))?,
    item: item.ok_or_else(|| missing(&wanted[1]))?,
    runes: runes.ok_or_else(|| missing(&wanted[2]))?,
  })
}
