use crate::target::TargetKind;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One voter's vote on one target. At most one row may exist per
/// `(user_id, target_kind, target_id)`; the deployment schema enforces
/// this with a unique index and the cast toggle is built around it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub vote_type: i16,
    pub target_kind: TargetKind,
    pub target_id: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
