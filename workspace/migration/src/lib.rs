pub use sea_orm_migration::prelude::*;

mod m20230808_000001_create_inventory_tables;
mod m20230808_000002_create_user_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230808_000001_create_inventory_tables::Migration),
            Box::new(m20230808_000002_create_user_profiles::Migration),
        ]
    }
}
