use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create inventory_languages table
        manager
            .create_table(
                Table::create()
                    .table(InventoryLanguages::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryLanguages::Id))
                    .col(timestamp_with_time_zone(InventoryLanguages::CreatedAt))
                    .col(timestamp_with_time_zone(InventoryLanguages::UpdatedAt))
                    .col(string_len(InventoryLanguages::Name, 255).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create inventory_tags table
        manager
            .create_table(
                Table::create()
                    .table(InventoryTags::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryTags::Id))
                    .col(timestamp_with_time_zone(InventoryTags::CreatedAt))
                    .col(timestamp_with_time_zone(InventoryTags::UpdatedAt))
                    .col(boolean(InventoryTags::IsActive).default(true))
                    .col(string_len(InventoryTags::Name, 255).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create inventory_types table
        manager
            .create_table(
                Table::create()
                    .table(InventoryTypes::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryTypes::Id))
                    .col(timestamp_with_time_zone(InventoryTypes::CreatedAt))
                    .col(timestamp_with_time_zone(InventoryTypes::UpdatedAt))
                    .col(string_len(InventoryTypes::Name, 255).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create inventories table
        manager
            .create_table(
                Table::create()
                    .table(Inventories::Table)
                    .if_not_exists()
                    .col(pk_auto(Inventories::Id))
                    .col(timestamp_with_time_zone(Inventories::CreatedAt))
                    .col(timestamp_with_time_zone(Inventories::UpdatedAt))
                    .col(string_len(Inventories::Name, 255))
                    .col(json(Inventories::Metadata))
                    .col(integer(Inventories::LanguageId))
                    .col(integer(Inventories::TypeId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_language")
                            .from(Inventories::Table, Inventories::LanguageId)
                            .to(InventoryLanguages::Table, InventoryLanguages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_type")
                            .from(Inventories::Table, Inventories::TypeId)
                            .to(InventoryTypes::Table, InventoryTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The by-date listing filters and sorts on created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_inventories_created_at")
                    .table(Inventories::Table)
                    .col(Inventories::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create inventories_tags table (join table)
        manager
            .create_table(
                Table::create()
                    .table(InventoriesTags::Table)
                    .if_not_exists()
                    .col(integer(InventoriesTags::InventoryId))
                    .col(integer(InventoriesTags::TagId))
                    .primary_key(
                        Index::create()
                            .name("pk_inventories_tags")
                            .col(InventoriesTags::InventoryId)
                            .col(InventoriesTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_tags_inventory")
                            .from(InventoriesTags::Table, InventoriesTags::InventoryId)
                            .to(Inventories::Table, Inventories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_tags_tag")
                            .from(InventoriesTags::Table, InventoriesTags::TagId)
                            .to(InventoryTags::Table, InventoryTags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(InventoriesTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Inventories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InventoryTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InventoryTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InventoryLanguages::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum InventoryLanguages {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Name,
}

#[derive(DeriveIden)]
enum InventoryTags {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    IsActive,
    Name,
}

#[derive(DeriveIden)]
enum InventoryTypes {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Name,
}

#[derive(DeriveIden)]
enum Inventories {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Name,
    Metadata,
    LanguageId,
    TypeId,
}

#[derive(DeriveIden)]
enum InventoriesTags {
    Table,
    InventoryId,
    TagId,
}
