use sea_orm::entity::prelude::*;

/// A label that can be attached to any number of inventory records.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Inactive tags stay attached to existing records but are hidden from
    /// the `active=true` listing.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_tag_link::Entity")]
    InventoryTagLink,
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        super::inventory_tag_link::Relation::Inventory.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::inventory_tag_link::Relation::Tag.def().rev())
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
