use super::{inventory, inventory_tag};
use sea_orm::entity::prelude::*;

/// Join table between inventories and their tags.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inventories_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub inventory_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "inventory::Entity",
        from = "Column::InventoryId",
        to = "inventory::Column::Id",
        on_delete = "Cascade"
    )]
    Inventory,
    #[sea_orm(
        belongs_to = "inventory_tag::Entity",
        from = "Column::TagId",
        to = "inventory_tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl Related<inventory_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
