use crate::orm::votes;
use crate::target::{Target, TargetKind};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, FromQueryResult};
use serde::Serialize;
use std::collections::HashMap;

pub const UPVOTE: i16 = 1;
pub const DOWNVOTE: i16 = -1;

/// Aggregate vote counts for one target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    pub fn net_score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

#[derive(Debug, FromQueryResult)]
struct VoteCountRow {
    target_id: i32,
    vote_type: i16,
    tally: i64,
}

/// Counts votes for every listed target of one kind in a single grouped
/// query. Targets without votes are present in the result with zeroed
/// counts; rows carrying an out-of-range vote value are skipped.
pub async fn count_for_kind(
    db: &DatabaseConnection,
    kind: TargetKind,
    ids: &[i32],
) -> Result<HashMap<i32, VoteTally>, DbErr> {
    let mut counts: HashMap<i32, VoteTally> =
        ids.iter().map(|id| (*id, VoteTally::default())).collect();
    if ids.is_empty() {
        return Ok(counts);
    }

    let rows = votes::Entity::find()
        .select_only()
        .column(votes::Column::TargetId)
        .column(votes::Column::VoteType)
        .column_as(votes::Column::Id.count(), "tally")
        .filter(votes::Column::TargetKind.eq(kind))
        .filter(votes::Column::TargetId.is_in(ids.iter().copied()))
        .group_by(votes::Column::TargetId)
        .group_by(votes::Column::VoteType)
        .into_model::<VoteCountRow>()
        .all(db)
        .await?;

    for row in rows {
        let entry = counts.entry(row.target_id).or_default();
        match row.vote_type {
            UPVOTE => entry.upvotes = row.tally,
            DOWNVOTE => entry.downvotes = row.tally,
            other => log::warn!(
                "ignoring {} stored votes with value {} on {:?} #{}",
                row.tally,
                other,
                kind,
                row.target_id
            ),
        }
    }

    Ok(counts)
}

/// Counts for an arbitrary mix of targets, one grouped query per kind.
pub async fn count_batch(
    db: &DatabaseConnection,
    targets: &[Target],
) -> Result<HashMap<Target, VoteTally>, DbErr> {
    let mut by_kind: HashMap<TargetKind, Vec<i32>> = HashMap::new();
    for target in targets {
        by_kind.entry(target.kind).or_default().push(target.id);
    }

    let mut counts = HashMap::new();
    for (kind, ids) in by_kind {
        for (id, tally) in count_for_kind(db, kind, &ids).await? {
            counts.insert(Target { kind, id }, tally);
        }
    }

    Ok(counts)
}

pub async fn count_for_target(
    db: &DatabaseConnection,
    target: Target,
) -> Result<VoteTally, DbErr> {
    Ok(count_for_kind(db, target.kind, &[target.id])
        .await?
        .remove(&target.id)
        .unwrap_or_default())
}

pub async fn net_score(db: &DatabaseConnection, target: Target) -> Result<i64, DbErr> {
    Ok(count_for_target(db, target).await?.net_score())
}

/// Sort key surface for annotated rows. Ties fall back to newest first.
pub trait Ranked {
    fn tally(&self) -> VoteTally;
    fn created_at(&self) -> chrono::NaiveDateTime;
}

pub fn sort_by_upvotes<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| {
        b.tally()
            .upvotes
            .cmp(&a.tally().upvotes)
            .then_with(|| b.created_at().cmp(&a.created_at()))
    });
}

pub fn sort_by_downvotes<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| {
        b.tally()
            .downvotes
            .cmp(&a.tally().downvotes)
            .then_with(|| b.created_at().cmp(&a.created_at()))
    });
}

pub fn sort_by_net_score<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| {
        b.tally()
            .net_score()
            .cmp(&a.tally().net_score())
            .then_with(|| b.created_at().cmp(&a.created_at()))
    });
}
