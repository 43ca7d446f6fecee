use crate::target::TargetKind;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A comment is attached to its host through the generic `(target_kind,
/// target_id)` pair. For a reply, that pair names the parent comment and
/// `parent_id` carries the same reference as a navigational back-pointer;
/// the chain always roots at a non-comment host.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub target_kind: TargetKind,
    pub target_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Parent,
}

impl ActiveModelBehavior for ActiveModel {}
