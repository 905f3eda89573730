use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, NotSet, Set, TransactionTrait};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, trace, warn};

use crate::helpers::timestamp::parse_aware_timestamp;
use model::entities::{
    inventory, inventory_language, inventory_tag, inventory_tag_link, inventory_type,
    user_profile::{self, normalize_email},
};

const LANGUAGE_MODEL: &str = "inventory.inventorylanguage";
const TAG_MODEL: &str = "inventory.inventorytag";
const TYPE_MODEL: &str = "inventory.inventorytype";
const INVENTORY_MODEL: &str = "inventory.inventory";
const PROFILE_MODEL: &str = "profiles.userprofile";

/// One entry of a `manage.py dumpdata` file
#[derive(Debug, Deserialize)]
pub struct DjangoRecord {
    model: String,
    #[serde(default, deserialize_with = "deserialize_pk")]
    pk: Option<i32>,
    fields: serde_json::Value,
}

impl DjangoRecord {
    /// Integer primary key; only skipped models may carry anything else.
    fn key(&self) -> Result<i32> {
        self.pk
            .with_context(|| format!("Record of model {} has no integer pk", self.model))
    }
}

/// Integer pks, numeric strings, or `None` for keys like session hashes
fn deserialize_pk<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;

    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom("pk number out of i32 range")),
        serde_json::Value::String(s) => Ok(s.parse::<i32>().ok()),
        serde_json::Value::Null => Ok(None),
        _ => Err(D::Error::custom("pk must be a number or string")),
    }
}

/// Fields shared by languages and types
#[derive(Debug, Deserialize)]
struct DjangoNamed {
    name: String,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DjangoTag {
    name: String,
    #[serde(default = "default_true")]
    is_active: bool,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DjangoInventory {
    name: String,
    #[serde(default)]
    metadata: serde_json::Value,
    language: i32,
    #[serde(rename = "type")]
    kind: i32,
    #[serde(default)]
    tags: Vec<i32>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DjangoUserProfile {
    email: String,
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    #[serde(default)]
    is_admin: bool,
    #[serde(default = "default_true")]
    is_active: bool,
    date_joined: Option<String>,
    last_login: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Counts of imported rows per kind
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub languages: usize,
    pub tags: usize,
    pub types: usize,
    pub inventories: usize,
    pub tag_links: usize,
    pub profiles: usize,
    pub skipped: usize,
}

/// Timestamp from the dump, or `NotSet` so the entity fills it in.
fn dumped_timestamp(raw: Option<&str>, field: &str) -> sea_orm::ActiveValue<DateTime<Utc>> {
    match raw.map(parse_aware_timestamp) {
        Some(Ok(timestamp)) => Set(timestamp),
        Some(Err(e)) => {
            warn!("Ignoring unusable {} value: {}", field, e);
            NotSet
        }
        None => NotSet,
    }
}

pub async fn import_django(json_path: &str, database_url: &str) -> Result<()> {
    trace!("Entering import_django function");
    info!("Starting Django data import");
    debug!("JSON path: {}", json_path);
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let path = Path::new(json_path);
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", json_path))?;

    info!("Parsing JSON data...");
    let records: Vec<DjangoRecord> = serde_json::from_reader(file).context("Failed to parse JSON")?;
    info!("Loaded {} records from Django dump", records.len());

    let txn = db.begin().await.context("Failed to start import transaction")?;
    let summary = import_records(&txn, &records).await?;
    txn.commit().await.context("Failed to commit imported data")?;

    info!("Django data import completed successfully!");
    info!("Summary:");
    info!("  - Languages: {}", summary.languages);
    info!("  - Tags: {}", summary.tags);
    info!("  - Types: {}", summary.types);
    info!("  - Inventories: {} ({} tag links)", summary.inventories, summary.tag_links);
    info!("  - Profiles: {}", summary.profiles);
    info!("  - Skipped records: {}", summary.skipped);

    Ok(())
}

/// Insert every supported record, parents before children. Dump primary keys
/// are remapped to the IDs the database hands out.
pub async fn import_records<C>(db: &C, records: &[DjangoRecord]) -> Result<ImportSummary>
where
    C: ConnectionTrait,
{
    let mut summary = ImportSummary::default();
    let mut language_map = HashMap::new();
    let mut tag_map = HashMap::new();
    let mut type_map = HashMap::new();

    info!("Importing languages, tags and types...");
    for record in records {
        match record.model.as_str() {
            LANGUAGE_MODEL => {
                let pk = record.key()?;
                let language: DjangoNamed = serde_json::from_value(record.fields.clone())
                    .with_context(|| format!("Invalid language record {}", pk))?;
                let inserted = inventory_language::ActiveModel {
                    name: Set(language.name.clone()),
                    created_at: dumped_timestamp(language.created_at.as_deref(), "created_at"),
                    updated_at: dumped_timestamp(language.updated_at.as_deref(), "updated_at"),
                    ..Default::default()
                }
                .insert(db)
                .await
                .with_context(|| format!("Failed to import language '{}'", language.name))?;
                language_map.insert(pk, inserted.id);
                debug!("Imported language {} -> ID {}", language.name, inserted.id);
            }
            TAG_MODEL => {
                let pk = record.key()?;
                let tag: DjangoTag = serde_json::from_value(record.fields.clone())
                    .with_context(|| format!("Invalid tag record {}", pk))?;
                let inserted = inventory_tag::ActiveModel {
                    name: Set(tag.name.clone()),
                    is_active: Set(tag.is_active),
                    created_at: dumped_timestamp(tag.created_at.as_deref(), "created_at"),
                    updated_at: dumped_timestamp(tag.updated_at.as_deref(), "updated_at"),
                    ..Default::default()
                }
                .insert(db)
                .await
                .with_context(|| format!("Failed to import tag '{}'", tag.name))?;
                tag_map.insert(pk, inserted.id);
                debug!("Imported tag {} -> ID {}", tag.name, inserted.id);
            }
            TYPE_MODEL => {
                let pk = record.key()?;
                let kind: DjangoNamed = serde_json::from_value(record.fields.clone())
                    .with_context(|| format!("Invalid type record {}", pk))?;
                let inserted = inventory_type::ActiveModel {
                    name: Set(kind.name.clone()),
                    created_at: dumped_timestamp(kind.created_at.as_deref(), "created_at"),
                    updated_at: dumped_timestamp(kind.updated_at.as_deref(), "updated_at"),
                    ..Default::default()
                }
                .insert(db)
                .await
                .with_context(|| format!("Failed to import type '{}'", kind.name))?;
                type_map.insert(pk, inserted.id);
                debug!("Imported type {} -> ID {}", kind.name, inserted.id);
            }
            INVENTORY_MODEL | PROFILE_MODEL => {}
            other => {
                trace!("Skipping record {:?} of model {}", record.pk, other);
                summary.skipped += 1;
            }
        }
    }
    summary.languages = language_map.len();
    summary.tags = tag_map.len();
    summary.types = type_map.len();

    info!("Importing inventories...");
    for record in records.iter().filter(|r| r.model == INVENTORY_MODEL) {
        let pk = record.key()?;
        let item: DjangoInventory = serde_json::from_value(record.fields.clone())
            .with_context(|| format!("Invalid inventory record {}", pk))?;

        let (Some(&language_id), Some(&type_id)) =
            (language_map.get(&item.language), type_map.get(&item.kind))
        else {
            warn!(
                "Skipping inventory '{}': language {} or type {} is not in the dump",
                item.name, item.language, item.kind
            );
            summary.skipped += 1;
            continue;
        };

        let metadata = if item.metadata.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            item.metadata.clone()
        };

        let inserted = inventory::ActiveModel {
            name: Set(item.name.clone()),
            metadata: Set(metadata),
            language_id: Set(language_id),
            type_id: Set(type_id),
            created_at: dumped_timestamp(item.created_at.as_deref(), "created_at"),
            updated_at: dumped_timestamp(item.updated_at.as_deref(), "updated_at"),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to import inventory '{}'", item.name))?;
        summary.inventories += 1;
        debug!("Imported inventory {} -> ID {}", item.name, inserted.id);

        for tag_pk in &item.tags {
            match tag_map.get(tag_pk) {
                Some(&tag_id) => {
                    inventory_tag_link::ActiveModel {
                        inventory_id: Set(inserted.id),
                        tag_id: Set(tag_id),
                    }
                    .insert(db)
                    .await?;
                    summary.tag_links += 1;
                    debug!("Linked inventory {} to tag {}", inserted.id, tag_id);
                }
                None => warn!("Inventory '{}' references unknown tag {}", item.name, tag_pk),
            }
        }
    }

    info!("Importing profiles...");
    for record in records.iter().filter(|r| r.model == PROFILE_MODEL) {
        let pk = record.key()?;
        let profile: DjangoUserProfile = serde_json::from_value(record.fields.clone())
            .with_context(|| format!("Invalid profile record {}", pk))?;

        let inserted = user_profile::ActiveModel {
            email: Set(normalize_email(&profile.email)),
            username: Set(profile.username.clone()),
            first_name: Set(profile.first_name.clone()),
            last_name: Set(profile.last_name.clone()),
            is_admin: Set(profile.is_admin),
            is_active: Set(profile.is_active),
            date_joined: dumped_timestamp(profile.date_joined.as_deref(), "date_joined"),
            last_login: Set(profile
                .last_login
                .as_deref()
                .and_then(|raw| parse_aware_timestamp(raw).ok())),
            // An unset ImageField is dumped as ""
            avatar: Set(profile.avatar.clone().filter(|path| !path.is_empty())),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to import profile '{}'", profile.email))?;
        summary.profiles += 1;
        debug!("Imported profile {} -> ID {}", inserted.email, inserted.id);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use chrono::TimeZone;
    use model::entities::prelude::*;
    use sea_orm::{EntityTrait, ModelTrait};

    fn dump() -> Vec<DjangoRecord> {
        serde_json::from_str(
            r#"[
                {"model": "inventory.inventorylanguage", "pk": 7, "fields": {
                    "created_at": "2023-08-01T10:00:00Z", "updated_at": "2023-08-01T10:00:00Z", "name": "English"}},
                {"model": "inventory.inventorytype", "pk": 3, "fields": {
                    "created_at": "2023-08-01T10:00:00Z", "updated_at": "2023-08-01T10:00:00Z", "name": "Book"}},
                {"model": "inventory.inventorytag", "pk": 11, "fields": {
                    "created_at": "2023-08-01T10:00:00Z", "updated_at": "2023-08-01T10:00:00Z", "is_active": false, "name": "classic"}},
                {"model": "inventory.inventory", "pk": 42, "fields": {
                    "created_at": "2023-08-02T09:30:00.250Z", "updated_at": "2023-08-03T09:30:00Z",
                    "name": "Moby Dick", "metadata": {"pages": 635}, "language": 7, "type": 3, "tags": [11, 99]}},
                {"model": "inventory.inventory", "pk": 43, "fields": {
                    "name": "Orphan", "metadata": {}, "language": 1, "type": 3, "tags": []}},
                {"model": "profiles.userprofile", "pk": 1, "fields": {
                    "password": "pbkdf2_sha256$x", "last_login": null, "email": "ada@EXAMPLE.com", "username": "ada",
                    "first_name": "Ada", "last_name": null, "is_admin": true,
                    "date_joined": "2023-07-30T08:00:00Z", "avatar": "", "groups": [], "user_permissions": []}},
                {"model": "sessions.session", "pk": "abc", "fields": {"session_data": "x"}}
            ]"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_import_records_remaps_keys_and_keeps_timestamps() {
        let db = setup_test_db().await;

        let summary = import_records(&db, &dump()).await.unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                languages: 1,
                tags: 1,
                types: 1,
                inventories: 1,
                tag_links: 1,
                profiles: 1,
                skipped: 2,
            }
        );

        let inventories = Inventory::find().all(&db).await.unwrap();
        assert_eq!(inventories.len(), 1);
        let moby = &inventories[0];
        assert_eq!(moby.name, "Moby Dick");
        assert_eq!(moby.metadata, serde_json::json!({"pages": 635}));
        assert_eq!(
            moby.created_at,
            Utc.with_ymd_and_hms(2023, 8, 2, 9, 30, 0).unwrap() + chrono::Duration::milliseconds(250)
        );
        assert_eq!(moby.updated_at, Utc.with_ymd_and_hms(2023, 8, 3, 9, 30, 0).unwrap());

        let tags = moby.find_related(InventoryTag).all(&db).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "classic");
        assert!(!tags[0].is_active);
    }

    #[tokio::test]
    async fn test_import_records_normalizes_profiles() {
        let db = setup_test_db().await;

        import_records(&db, &dump()).await.unwrap();

        let profile = user_profile::find_by_email(&db, "ada@example.com")
            .await
            .unwrap()
            .expect("imported profile");
        assert_eq!(profile.email, "ada@example.com");
        assert!(profile.is_admin);
        assert!(profile.is_active);
        assert_eq!(profile.avatar, None);
        assert_eq!(profile.last_login, None);
        assert_eq!(profile.date_joined, Utc.with_ymd_and_hms(2023, 7, 30, 8, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_names_abort_the_import() {
        let db = setup_test_db().await;
        let records: Vec<DjangoRecord> = serde_json::from_str(
            r#"[
                {"model": "inventory.inventorytype", "pk": 1, "fields": {"name": "Book"}},
                {"model": "inventory.inventorytype", "pk": 2, "fields": {"name": "Book"}}
            ]"#,
        )
        .unwrap();

        let result = import_records(&db, &records).await;

        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to import type 'Book'"));
    }

    #[tokio::test]
    async fn test_supported_record_without_integer_pk_is_rejected() {
        let db = setup_test_db().await;
        let records: Vec<DjangoRecord> = serde_json::from_str(
            r#"[
                {"model": "inventory.inventorylanguage", "pk": "en", "fields": {"name": "English"}},
                {"model": "inventory.inventorylanguage", "pk": "fr", "fields": {"name": "French"}}
            ]"#,
        )
        .unwrap();

        let result = import_records(&db, &records).await;

        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("has no integer pk"));
        assert!(InventoryLanguage::find().all(&db).await.unwrap().is_empty());
    }

    #[test]
    fn test_numeric_string_pk_is_accepted() {
        let record: DjangoRecord =
            serde_json::from_str(r#"{"model": "inventory.inventorytype", "pk": "12", "fields": {}}"#)
                .unwrap();

        assert_eq!(record.key().unwrap(), 12);
    }
}
