use crate::error::ForumError;
use crate::orm::votes;
use crate::score::{self, DOWNVOTE, UPVOTE};
use crate::target::{self, Target, TargetKind};
use chrono::prelude::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;

/// What a cast did to the voter's existing vote row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CastStatus {
    Created,
    Updated,
    Removed,
}

/// Outcome of a cast, with fresh counts for the response payload.
#[derive(Debug, Serialize)]
pub struct CastOutcome {
    pub status: CastStatus,
    pub upvotes: i64,
    pub downvotes: i64,
    pub user_vote: i16,
}

/// Casts `value` for `voter_id` on `target`, toggling any existing vote:
/// no row creates one, a same-value row is deleted (un-vote), an
/// opposite-value row flips in place. Counts are recomputed afterwards,
/// never cached on the row.
pub async fn cast(
    db: &DatabaseConnection,
    voter_id: i32,
    target: Target,
    value: i16,
) -> Result<CastOutcome, ForumError> {
    if value != UPVOTE && value != DOWNVOTE {
        return Err(ForumError::Validation(
            "vote_type must be 1 or -1.".to_owned(),
        ));
    }
    target::resolve(db, target).await?;

    let txn = db.begin().await?;
    let (status, user_vote) = toggle(&txn, voter_id, target, value).await?;
    txn.commit().await?;

    let tally = score::count_for_target(db, target).await?;
    Ok(CastOutcome {
        status,
        upvotes: tally.upvotes,
        downvotes: tally.downvotes,
        user_vote,
    })
}

/// The toggle state machine, atomic per `(voter, target)` tuple. The
/// unique index on votes is the backstop: an insert that loses a race
/// comes back as a no-op and the loop re-reads the winning row.
async fn toggle<C: ConnectionTrait>(
    db: &C,
    voter_id: i32,
    target: Target,
    value: i16,
) -> Result<(CastStatus, i16), DbErr> {
    loop {
        let existing = votes::Entity::find()
            .filter(votes::Column::UserId.eq(voter_id))
            .filter(votes::Column::TargetKind.eq(target.kind))
            .filter(votes::Column::TargetId.eq(target.id))
            .one(db)
            .await?;

        match existing {
            None => {
                let now = Utc::now().naive_utc();
                let insert = votes::Entity::insert(votes::ActiveModel {
                    user_id: Set(voter_id),
                    vote_type: Set(value),
                    target_kind: Set(target.kind),
                    target_id: Set(target.id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .on_conflict(
                    OnConflict::columns([
                        votes::Column::UserId,
                        votes::Column::TargetKind,
                        votes::Column::TargetId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec(db)
                .await;

                match insert {
                    Ok(_) => return Ok((CastStatus::Created, value)),
                    // A concurrent cast won the insert; toggle against its row.
                    Err(DbErr::RecordNotInserted) => continue,
                    Err(err) => return Err(err),
                }
            }
            Some(vote) if vote.vote_type == value => {
                votes::Entity::delete_by_id(vote.id).exec(db).await?;
                return Ok((CastStatus::Removed, 0));
            }
            Some(vote) => {
                let mut vote: votes::ActiveModel = vote.into();
                vote.vote_type = Set(value);
                vote.updated_at = Set(Utc::now().naive_utc());
                match vote.update(db).await {
                    Ok(_) => return Ok((CastStatus::Updated, value)),
                    // The row vanished under us (concurrent un-vote); retry.
                    Err(DbErr::RecordNotUpdated) => continue,
                    Err(err) => return Err(err),
                }
            }
        }
    }
}

/// The signed vote (`1`, `-1` or `0`) `voter_id` holds on each target.
/// Guests never reach the store; authenticated lookups run one query per
/// kind present in the set, not one per target.
pub async fn votes_for_user(
    db: &DatabaseConnection,
    voter_id: Option<i32>,
    targets: &[Target],
) -> Result<HashMap<Target, i16>, DbErr> {
    let mut states: HashMap<Target, i16> = targets.iter().map(|t| (*t, 0)).collect();
    let voter_id = match voter_id {
        Some(id) => id,
        None => return Ok(states),
    };

    let mut by_kind: HashMap<TargetKind, Vec<i32>> = HashMap::new();
    for target in targets {
        by_kind.entry(target.kind).or_default().push(target.id);
    }

    for (kind, ids) in by_kind {
        let rows = votes::Entity::find()
            .filter(votes::Column::UserId.eq(voter_id))
            .filter(votes::Column::TargetKind.eq(kind))
            .filter(votes::Column::TargetId.is_in(ids))
            .all(db)
            .await?;
        for vote in rows {
            states.insert(Target { kind, id: vote.target_id }, vote.vote_type);
        }
    }

    Ok(states)
}
