use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(pk_auto(UserProfiles::Id))
                    .col(string_len(UserProfiles::Email, 254).unique_key())
                    .col(string_len(UserProfiles::Username, 254).unique_key())
                    .col(string_len_null(UserProfiles::FirstName, 254))
                    .col(string_len_null(UserProfiles::LastName, 254))
                    .col(boolean(UserProfiles::IsAdmin).default(false))
                    .col(boolean(UserProfiles::IsActive).default(true))
                    .col(timestamp_with_time_zone(UserProfiles::DateJoined))
                    .col(timestamp_with_time_zone_null(UserProfiles::LastLogin))
                    .col(string_len_null(UserProfiles::Avatar, 255))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    IsAdmin,
    IsActive,
    DateJoined,
    LastLogin,
    Avatar,
}
