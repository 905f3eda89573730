//! SeaORM entities for the inventory catalogue and user profiles.
//!
//! Timestamps are maintained by each entity's `ActiveModelBehavior`:
//! `created_at` is filled on insert when left unset, `updated_at` follows it
//! on insert and is refreshed on every update.

use chrono::Utc;
use sea_orm::entity::prelude::DateTimeUtc;
use sea_orm::{ActiveValue, Set};

pub mod inventory;
pub mod inventory_language;
pub mod inventory_tag;
pub mod inventory_tag_link;
pub mod inventory_type;
pub mod user_profile;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::inventory::Entity as Inventory;
    pub use super::inventory_language::Entity as InventoryLanguage;
    pub use super::inventory_tag::Entity as InventoryTag;
    pub use super::inventory_tag_link::Entity as InventoryTagLink;
    pub use super::inventory_type::Entity as InventoryType;
    pub use super::user_profile::Entity as UserProfile;
}

pub(crate) fn stamp(
    created_at: &mut ActiveValue<DateTimeUtc>,
    updated_at: &mut ActiveValue<DateTimeUtc>,
    insert: bool,
) {
    let now = Utc::now();

    if !insert {
        *updated_at = Set(now);
        return;
    }

    if created_at.is_not_set() {
        *created_at = Set(now);
    }
    if updated_at.is_not_set() {
        let created = match &*created_at {
            ActiveValue::Set(value) | ActiveValue::Unchanged(value) => *value,
            ActiveValue::NotSet => now,
        };
        *updated_at = Set(created);
    }
}

#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };
    use serde_json::json;

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn create_language(db: &DatabaseConnection, name: &str) -> Result<inventory_language::Model, DbErr> {
        inventory_language::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn create_type(db: &DatabaseConnection, name: &str) -> Result<inventory_type::Model, DbErr> {
        inventory_type::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn create_inventory(
        db: &DatabaseConnection,
        name: &str,
        language_id: i32,
        type_id: i32,
    ) -> Result<inventory::Model, DbErr> {
        inventory::ActiveModel {
            name: Set(name.to_string()),
            metadata: Set(json!({ "pages": 120, "authors": ["A", "B"] })),
            language_id: Set(language_id),
            type_id: Set(type_id),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let english = create_language(&db, "English").await?;
        let book = create_type(&db, "Book").await?;

        let fiction = inventory_tag::ActiveModel {
            name: Set("Fiction".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert!(fiction.is_active);

        let classics = inventory_tag::ActiveModel {
            name: Set("Classics".to_string()),
            is_active: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let item = create_inventory(&db, "Moby Dick", english.id, book.id).await?;
        for tag_id in [fiction.id, classics.id] {
            inventory_tag_link::ActiveModel {
                inventory_id: Set(item.id),
                tag_id: Set(tag_id),
            }
            .insert(&db)
            .await?;
        }

        // Metadata comes back untouched
        let stored = Inventory::find_by_id(item.id).one(&db).await?.unwrap();
        assert_eq!(stored.metadata, json!({ "pages": 120, "authors": ["A", "B"] }));
        assert_eq!(stored.created_at, stored.updated_at);

        // Tags through the join table
        let tags = stored.find_related(InventoryTag).all(&db).await?;
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().any(|t| t.name == "Fiction"));
        assert!(tags.iter().any(|t| t.name == "Classics"));

        // And back from a tag to its inventories
        let tagged = fiction.find_related(Inventory).all(&db).await?;
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, item.id);

        let language = stored.find_related(InventoryLanguage).one(&db).await?.unwrap();
        assert_eq!(language.name, "English");

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_names_are_enforced() -> Result<(), DbErr> {
        let db = setup_db().await?;

        create_language(&db, "English").await?;
        let err = create_language(&db, "English").await.unwrap_err();
        assert!(matches!(err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))));

        create_type(&db, "Book").await?;
        assert!(create_type(&db, "Book").await.is_err());

        let tag = inventory_tag::ActiveModel {
            name: Set("Fiction".to_string()),
            ..Default::default()
        };
        tag.clone().insert(&db).await?;
        assert!(tag.insert(&db).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_foreign_key_is_rejected() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let english = create_language(&db, "English").await?;
        let err = create_inventory(&db, "Orphan", english.id, 999).await.unwrap_err();
        assert!(matches!(err.sql_err(), Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_))));
        assert_eq!(Inventory::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_language_cascades_to_inventories() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let english = create_language(&db, "English").await?;
        let german = create_language(&db, "German").await?;
        let book = create_type(&db, "Book").await?;

        let doomed = create_inventory(&db, "Moby Dick", english.id, book.id).await?;
        create_inventory(&db, "Faust", german.id, book.id).await?;

        let tag = inventory_tag::ActiveModel {
            name: Set("Fiction".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        inventory_tag_link::ActiveModel {
            inventory_id: Set(doomed.id),
            tag_id: Set(tag.id),
        }
        .insert(&db)
        .await?;

        english.delete(&db).await?;

        let remaining = Inventory::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Faust");

        // The association went with the inventory; the tag itself stays
        assert_eq!(InventoryTagLink::find().count(&db).await?, 0);
        assert!(InventoryTag::find_by_id(tag.id).one(&db).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_type_cascades_to_inventories() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let english = create_language(&db, "English").await?;
        let book = create_type(&db, "Book").await?;
        let manual = create_type(&db, "Manual").await?;

        create_inventory(&db, "Moby Dick", english.id, book.id).await?;
        create_inventory(&db, "Dishwasher manual", english.id, manual.id).await?;

        InventoryType::delete_by_id(manual.id).exec(&db).await?;

        let remaining = Inventory::find()
            .filter(inventory::Column::TypeId.eq(manual.id))
            .count(&db)
            .await?;
        assert_eq!(remaining, 0);
        assert_eq!(Inventory::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_tag_keeps_inventories() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let english = create_language(&db, "English").await?;
        let book = create_type(&db, "Book").await?;
        let item = create_inventory(&db, "Moby Dick", english.id, book.id).await?;
        let tag = inventory_tag::ActiveModel {
            name: Set("Fiction".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        inventory_tag_link::ActiveModel {
            inventory_id: Set(item.id),
            tag_id: Set(tag.id),
        }
        .insert(&db)
        .await?;

        tag.delete(&db).await?;

        assert_eq!(Inventory::find().count(&db).await?, 1);
        assert_eq!(InventoryTagLink::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_only() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let english = create_language(&db, "English").await?;
        let created_at = english.created_at;

        let mut active: inventory_language::ActiveModel = english.into();
        active.name = Set("British English".to_string());
        let renamed = active.update(&db).await?;

        assert_eq!(renamed.created_at, created_at);
        assert!(renamed.updated_at >= created_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_created_at_is_kept() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let english = create_language(&db, "English").await?;
        let book = create_type(&db, "Book").await?;
        let backdated = Utc::now() - Duration::days(20);

        let item = inventory::ActiveModel {
            name: Set("Old record".to_string()),
            metadata: Set(json!({})),
            language_id: Set(english.id),
            type_id: Set(book.id),
            created_at: Set(backdated),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        assert_eq!(item.created_at, backdated);
        assert_eq!(item.updated_at, backdated);

        Ok(())
    }

    #[tokio::test]
    async fn test_user_profile_identity() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let ada = user_profile::ActiveModel {
            email: Set(user_profile::normalize_email("ada@Example.com")),
            username: Set("ada".to_string()),
            first_name: Set(Some("Ada".to_string())),
            last_name: Set(Some("Lovelace".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        assert!(!ada.is_admin);
        assert!(ada.is_active);
        assert_eq!(ada.full_name(), "Ada Lovelace");

        let found = user_profile::find_by_email(&db, "ada@EXAMPLE.COM").await?;
        assert_eq!(found.map(|p| p.id), Some(ada.id));

        let duplicate_email = user_profile::ActiveModel {
            email: Set("ada@example.com".to_string()),
            username: Set("someone-else".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(duplicate_email.is_err());

        let duplicate_username = user_profile::ActiveModel {
            email: Set("other@example.com".to_string()),
            username: Set("ada".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(duplicate_username.is_err());

        assert_eq!(UserProfile::find().count(&db).await?, 1);

        Ok(())
    }
}
