// Test helpers: raw Data Dragon files, in-memory release archives and a counting source

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::bravery::store::CatalogSource;
use crate::bravery::Catalog;
use crate::error::{Error, Result};

pub const VERSION: &str = "10.25.1";
pub const LOCALE: &str = "en_US";

pub const ANNIE: i64 = 1;
pub const CASSIOPEIA: i64 = 69;
pub const GAREN: i64 = 86;
pub const ZED: i64 = 238;

fn champion(name: &str, key: i64) -> Value {
    json!({
        "id": name,
        "key": key.to_string(),
        "name": name,
        "image": {"full": format!("{}.png", name)},
        "tags": ["Mage"]
    })
}

pub fn champion_json() -> Value {
    json!({
        "type": "champion",
        "version": VERSION,
        "data": {
            "Annie": champion("Annie", ANNIE),
            "Cassiopeia": champion("Cassiopeia", CASSIOPEIA),
            "Garen": champion("Garen", GAREN),
            "Zed": champion("Zed", ZED)
        }
    })
}

fn item(name: &str, total: i64, tags: &[&str], description: &str) -> Value {
    json!({
        "name": name,
        "description": description,
        "gold": {"base": total, "purchasable": true, "total": total, "sell": total / 2},
        "tags": tags,
        "image": {"full": format!("{}.png", name.replace(' ', ""))}
    })
}

fn mythic(name: &str, total: i64) -> Value {
    item(
        name,
        total,
        &["SpellDamage"],
        "<mainText><stats>+80 Ability Power</stats><br><rarityMythic>Mythic Passive:</rarityMythic></mainText>",
    )
}

pub fn item_json() -> Value {
    let mut data = Map::new();
    data.insert("1001".into(), item("Boots", 300, &["Boots"], "Slightly increases Move Speed"));
    data.insert("1052".into(), item("Amplifying Tome", 435, &["SpellDamage"], "+20 Ability Power"));
    data.insert("3006".into(), item("Berserker's Greaves", 1100, &["Boots", "AttackSpeed"], "+35% Attack Speed"));
    data.insert("3020".into(), item("Sorcerer's Shoes", 1100, &["Boots", "MagicPenetration"], "+18 Magic Penetration"));
    data.insert("3047".into(), item("Plated Steelcaps", 1100, &["Boots", "Armor"], "+20 Armor"));
    data.insert("6653".into(), mythic("Liandry's Anguish", 3400));
    data.insert("3078".into(), mythic("Trinity Force", 3333));
    data.insert("6630".into(), mythic("Goredrinker", 3300));
    data.insert("3089".into(), item("Rabadon's Deathcap", 3800, &["SpellDamage"], "+120 Ability Power"));
    data.insert("3135".into(), item("Void Staff", 2800, &["SpellDamage"], "+65 Ability Power"));
    data.insert("3157".into(), item("Zhonya's Hourglass", 2600, &["Armor"], "+65 Ability Power"));
    data.insert("3165".into(), item("Morellonomicon", 2500, &["SpellDamage"], "+80 Ability Power"));
    data.insert("3116".into(), item("Rylai's Crystal Scepter", 2600, &["Health"], "+300 Health"));
    data.insert("3036".into(), item("Lord Dominik's Regards", 2800, &["Damage"], "+30 Attack Damage"));
    let mut your_cut = item("Your Cut", 0, &[], "Gold for your team");
    your_cut["gold"]["purchasable"] = json!(false);
    data.insert("3400".into(), your_cut);
    data.insert("Ornn7000".into(), item("Sandshrike's Claw", 3000, &["Damage"], "Masterwork"));

    json!({"type": "item", "version": VERSION, "data": data})
}

pub const PREMIUM_BOOTS: i64 = 3010;

/// `item_json` plus a pair of boots priced above the legendary floor.
pub fn item_json_with_premium_boots() -> Value {
    let mut raw = item_json();
    raw["data"][PREMIUM_BOOTS.to_string()] =
        item("Gilded Greaves", 2500, &["Boots", "Armor"], "+40 Armor, +10% Move Speed");
    raw
}

pub fn catalog_with_premium_boots() -> Catalog {
    Catalog::from_raw(VERSION, &champion_json(), &item_json_with_premium_boots(), &runes_json()).unwrap()
}

fn rune_row(base: i64) -> Value {
    json!({
        "runes": (0..3)
            .map(|i| json!({
                "id": base + i,
                "key": format!("Rune{}", base + i),
                "icon": format!("perk-images/Styles/{}.png", base + i),
                "name": format!("Rune {}", base + i)
            }))
            .collect::<Vec<_>>()
    })
}

fn rune_tree(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "key": name,
        "icon": format!("perk-images/Styles/{}.png", name),
        "name": name,
        "slots": [rune_row(id + 10), rune_row(id + 20), rune_row(id + 30), rune_row(id + 40)]
    })
}

pub const TREES: [(i64, &str); 5] = [
    (8000, "Precision"),
    (8100, "Domination"),
    (8200, "Sorcery"),
    (8300, "Inspiration"),
    (8400, "Resolve"),
];

pub fn runes_json() -> Value {
    Value::Array(TREES.iter().map(|(id, name)| rune_tree(*id, name)).collect())
}

pub fn sample_catalog() -> Catalog {
    Catalog::from_raw(VERSION, &champion_json(), &item_json(), &runes_json()).unwrap()
}

fn append<W: Write>(builder: &mut tar::Builder<W>, path: &str, data: &[u8]) {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    builder.append_data(&mut header, path, data).unwrap();
}

/// Write a `dragontail-{version}.tgz` lookalike holding the three catalog files
/// plus some unrelated entries. `prefix` is prepended to every entry path.
pub fn write_dragontail(dest: &Path, version: &str, prefix: &str) {
    let file = File::create(dest).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::fast()));

    append(&mut builder, &format!("{}{}/img/champion/Annie.png", prefix, version), b"\x89PNG");
    for (name, body) in [
        ("champion.json", champion_json()),
        ("item.json", item_json()),
        ("runesReforged.json", runes_json()),
    ] {
        let path = format!("{}{}/data/{}/{}", prefix, version, LOCALE, name);
        append(&mut builder, &path, body.to_string().as_bytes());
    }
    append(&mut builder, &format!("{}{}/data/de_DE/item.json", prefix, version), b"{}");

    builder.into_inner().unwrap().finish().unwrap();
}

/// Archive without `runesReforged.json`.
pub fn write_incomplete_dragontail(dest: &Path, version: &str) {
    let file = File::create(dest).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::fast()));
    let path = format!("{}/data/{}/champion.json", version, LOCALE);
    append(&mut builder, &path, champion_json().to_string().as_bytes());
    builder.into_inner().unwrap().finish().unwrap();
}

/// Catalog source that serves generated archives and counts every network call.
pub struct FakeSource {
    latest: Mutex<String>,
    version_lookups: AtomicUsize,
    downloads: Mutex<Vec<String>>,
    incomplete: AtomicBool,
}

impl FakeSource {
    pub fn new(latest: &str) -> Arc<Self> {
        Arc::new(Self {
            latest: Mutex::new(latest.to_string()),
            version_lookups: AtomicUsize::new(0),
            downloads: Mutex::new(Vec::new()),
            incomplete: AtomicBool::new(false),
        })
    }

    pub fn publish(&self, version: &str) {
        *self.latest.lock().unwrap() = version.to_string();
    }

    pub fn serve_incomplete(&self) {
        self.incomplete.store(true, Ordering::SeqCst);
    }

    pub fn version_lookups(&self) -> usize {
        self.version_lookups.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }

    /// Every network call the store made.
    pub fn fetches(&self) -> usize {
        self.version_lookups() + self.downloads().len()
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn latest_version(&self) -> Result<String> {
        self.version_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.latest.lock().unwrap().clone())
    }

    async fn download_archive(&self, version: &str, dest: &Path) -> Result<()> {
        self.downloads.lock().unwrap().push(version.to_string());
        if version.starts_with("404") {
            return Err(Error::Transport {
                operation: format!("download catalog {}", version),
                status: Some(404),
                message: "not found".to_string(),
            });
        }
        if self.incomplete.load(Ordering::SeqCst) {
            write_incomplete_dragontail(dest, version);
        } else {
            write_dragontail(dest, version, "");
        }
        Ok(())
    }
}
