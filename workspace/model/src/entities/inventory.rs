use super::{inventory_language, inventory_tag, inventory_type};
use sea_orm::entity::prelude::*;

/// An inventory record: a named item with free-form metadata, written in one
/// language, of one type, carrying any number of tags.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub name: String,
    /// Schema-less document, stored and returned as-is.
    pub metadata: Json,
    pub language_id: i32,
    pub type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "inventory_language::Entity",
        from = "Column::LanguageId",
        to = "inventory_language::Column::Id",
        on_delete = "Cascade"
    )]
    Language,
    #[sea_orm(
        belongs_to = "inventory_type::Entity",
        from = "Column::TypeId",
        to = "inventory_type::Column::Id",
        on_delete = "Cascade"
    )]
    Type,
    /// Relation for the many-to-many relationship with tags.
    #[sea_orm(has_many = "super::inventory_tag_link::Entity")]
    InventoryTagLink,
}

impl Related<inventory_language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Language.def()
    }
}

impl Related<inventory_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Type.def()
    }
}

impl Related<inventory_tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::inventory_tag_link::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::inventory_tag_link::Relation::Inventory.def().rev())
    }
}

impl Related<super::inventory_tag_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryTagLink.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        super::stamp(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}
