use crate::error::ForumError;
use crate::orm::comments;
use crate::pagination::{clamp_page, Page};
use crate::score::{self, VoteTally};
use crate::target::{self, Target, TargetKind};
use crate::vote;
use chrono::prelude::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, PaginatorTrait};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const COMMENTS_PER_PAGE: u64 = 3;

/// Ceiling on reply nesting when assembling a forest. The data model does
/// not bound depth; rows past this level are left out of the tree.
pub const MAX_REPLY_DEPTH: usize = 32;

/// One comment with its vote annotations and nested replies. `children`
/// is empty, never missing, for leaf comments.
#[derive(Debug, Serialize)]
pub struct CommentNode {
    pub comment: comments::Model,
    pub upvotes: i64,
    pub downvotes: i64,
    pub user_vote: i16,
    pub children: Vec<CommentNode>,
}

/// Fields accepted from a comment submission.
#[derive(Debug, Deserialize)]
pub struct NewCommentData {
    pub content: String,
    pub parent_id: Option<i32>,
}

/// The full forest for a host: every top-level comment, hydrated.
pub async fn comment_forest(
    db: &DatabaseConnection,
    host: Target,
    viewer_id: Option<i32>,
) -> Result<Vec<CommentNode>, ForumError> {
    target::resolve(db, host).await?;

    let roots = top_level_query(host).all(db).await?;
    hydrate(db, roots, viewer_id).await
}

/// One page of top-level comments, each carrying its complete reply
/// subtree. Only the top level is paginated.
pub async fn comment_page(
    db: &DatabaseConnection,
    host: Target,
    viewer_id: Option<i32>,
    page: Option<u64>,
) -> Result<Page<CommentNode>, ForumError> {
    target::resolve(db, host).await?;

    let paginator = top_level_query(host).paginate(db, COMMENTS_PER_PAGE);
    let num_pages = paginator.num_pages().await?;
    let page_number = clamp_page(page, num_pages);
    let roots = paginator.fetch_page(page_number - 1).await?;

    let items = hydrate(db, roots, viewer_id).await?;
    Ok(Page::new(items, page_number, num_pages))
}

/// Top-level comments are the rows whose target is the host itself;
/// replies target their parent comment and never match this filter.
fn top_level_query(host: Target) -> Select<comments::Entity> {
    comments::Entity::find()
        .filter(comments::Column::TargetKind.eq(host.kind))
        .filter(comments::Column::TargetId.eq(host.id))
        .order_by_desc(comments::Column::CreatedAt)
}

/// Loads every descendant of `roots` breadth-first (one query per level),
/// attaches counts and the viewer's vote states across the whole forest
/// in one pass each, and assembles the tree.
async fn hydrate(
    db: &DatabaseConnection,
    roots: Vec<comments::Model>,
    viewer_id: Option<i32>,
) -> Result<Vec<CommentNode>, ForumError> {
    if roots.is_empty() {
        return Ok(Vec::new());
    }

    let mut replies_by_parent: HashMap<i32, Vec<comments::Model>> = HashMap::new();
    let mut all_ids: Vec<i32> = roots.iter().map(|c| c.id).collect();
    let mut frontier = all_ids.clone();
    let mut depth = 0;

    while !frontier.is_empty() {
        if depth >= MAX_REPLY_DEPTH {
            log::warn!(
                "comment nesting exceeds {} levels; deeper replies were not loaded",
                MAX_REPLY_DEPTH
            );
            break;
        }

        let level = comments::Entity::find()
            .filter(comments::Column::TargetKind.eq(TargetKind::Comment))
            .filter(comments::Column::TargetId.is_in(frontier))
            .order_by_desc(comments::Column::CreatedAt)
            .all(db)
            .await?;

        frontier = level.iter().map(|c| c.id).collect();
        all_ids.extend(frontier.iter().copied());
        for reply in level {
            replies_by_parent
                .entry(reply.target_id)
                .or_default()
                .push(reply);
        }
        depth += 1;
    }

    let tallies = score::count_for_kind(db, TargetKind::Comment, &all_ids).await?;
    let targets: Vec<Target> = all_ids.iter().map(|id| Target::comment(*id)).collect();
    let states = vote::votes_for_user(db, viewer_id, &targets).await?;

    Ok(build_nodes(roots, &mut replies_by_parent, &tallies, &states))
}

fn build_nodes(
    models: Vec<comments::Model>,
    replies: &mut HashMap<i32, Vec<comments::Model>>,
    tallies: &HashMap<i32, VoteTally>,
    states: &HashMap<Target, i16>,
) -> Vec<CommentNode> {
    models
        .into_iter()
        .map(|comment| {
            let children = replies
                .remove(&comment.id)
                .map(|kids| build_nodes(kids, replies, tallies, states))
                .unwrap_or_default();
            let tally = tallies.get(&comment.id).copied().unwrap_or_default();
            let user_vote = states
                .get(&Target::comment(comment.id))
                .copied()
                .unwrap_or(0);
            CommentNode {
                upvotes: tally.upvotes,
                downvotes: tally.downvotes,
                user_vote,
                children,
                comment,
            }
        })
        .collect()
}

/// Creates a comment on `host`, or a reply when `parent_id` is given.
/// A reply targets its parent comment so the chain stays consistent with
/// the back-reference.
pub async fn create_comment(
    db: &DatabaseConnection,
    author_id: i32,
    host: Target,
    data: NewCommentData,
) -> Result<comments::Model, ForumError> {
    // Run content through the validator before touching any target.
    let content = validate_content(data.content)?;

    let (target, parent_id) = match data.parent_id {
        Some(parent_id) => {
            let parent = comments::Entity::find_by_id(parent_id)
                .one(db)
                .await?
                .ok_or(ForumError::NotFound(TargetKind::Comment))?;
            (Target::comment(parent.id), Some(parent.id))
        }
        None => {
            target::resolve(db, host).await?;
            (host, None)
        }
    };

    let now = Utc::now().naive_utc();
    let comment = comments::ActiveModel {
        user_id: Set(author_id),
        content: Set(content),
        target_kind: Set(target.kind),
        target_id: Set(target.id),
        parent_id: Set(parent_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(comment)
}

/// Rewrites a comment's content. Only the author may edit.
pub async fn update_comment(
    db: &DatabaseConnection,
    actor_id: i32,
    comment_id: i32,
    content: String,
) -> Result<comments::Model, ForumError> {
    let comment = comments::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or(ForumError::NotFound(TargetKind::Comment))?;

    if comment.user_id != actor_id {
        return Err(ForumError::Forbidden("comment"));
    }

    let content = validate_content(content)?;
    let mut comment: comments::ActiveModel = comment.into();
    comment.content = Set(content);
    comment.updated_at = Set(Utc::now().naive_utc());
    Ok(comment.update(db).await?)
}

/// Deletes a comment and its whole reply subtree. Only the author may
/// delete. Vote rows on the removed comments stay behind; they are
/// unreachable once the rows are gone.
pub async fn delete_comment(
    db: &DatabaseConnection,
    actor_id: i32,
    comment_id: i32,
) -> Result<(), ForumError> {
    let comment = comments::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or(ForumError::NotFound(TargetKind::Comment))?;

    if comment.user_id != actor_id {
        return Err(ForumError::Forbidden("comment"));
    }

    // Walk the subtree level by level. The visited set keeps a malformed
    // (cyclic) chain from looping the walk.
    let mut doomed: HashSet<i32> = HashSet::from([comment.id]);
    let mut frontier = vec![comment.id];
    while !frontier.is_empty() {
        let level: Vec<i32> = comments::Entity::find()
            .select_only()
            .column(comments::Column::Id)
            .filter(comments::Column::TargetKind.eq(TargetKind::Comment))
            .filter(comments::Column::TargetId.is_in(frontier))
            .into_tuple()
            .all(db)
            .await?;
        frontier = level.into_iter().filter(|id| doomed.insert(*id)).collect();
    }

    comments::Entity::delete_many()
        .filter(comments::Column::Id.is_in(doomed))
        .exec(db)
        .await?;

    Ok(())
}

fn validate_content(content: String) -> Result<String, ForumError> {
    let clean = content.trim();
    if clean.is_empty() {
        return Err(ForumError::Validation(
            "Comment content must not be empty.".to_owned(),
        ));
    }
    Ok(clean.to_owned())
}
