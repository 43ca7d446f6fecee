use crate::comment::{self, CommentNode};
use crate::error::ForumError;
use crate::orm::{answers, questions};
use crate::pagination::{clamp_page, Page};
use crate::score::{self, Ranked, VoteTally};
use crate::target::{Target, TargetKind};
use crate::vote;
use chrono::prelude::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, PaginatorTrait};
use serde::{Deserialize, Serialize};

pub const ANSWERS_PER_PAGE: u64 = 3;

/// An answer row with its vote annotations for list rendering.
#[derive(Debug, Serialize)]
pub struct AnswerForList {
    pub answer: answers::Model,
    pub upvotes: i64,
    pub downvotes: i64,
    pub user_vote: i16,
}

impl Ranked for AnswerForList {
    fn tally(&self) -> VoteTally {
        VoteTally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    fn created_at(&self) -> chrono::NaiveDateTime {
        self.answer.created_at
    }
}

/// An answer with its vote context and one page of its comment forest.
#[derive(Debug, Serialize)]
pub struct AnswerDetail {
    pub answer: AnswerForList,
    pub comments: Page<CommentNode>,
}

#[derive(Debug, Deserialize)]
pub struct NewAnswerData {
    pub content: String,
}

/// One page of a question's answers, newest first, annotated with counts
/// and the viewer's vote in two batched queries.
pub async fn answer_page(
    db: &DatabaseConnection,
    question_id: i32,
    viewer_id: Option<i32>,
    page: Option<u64>,
) -> Result<Page<AnswerForList>, ForumError> {
    if questions::Entity::find_by_id(question_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(ForumError::NotFound(TargetKind::Question));
    }

    let paginator = answers::Entity::find()
        .filter(answers::Column::QuestionId.eq(question_id))
        .order_by_desc(answers::Column::CreatedAt)
        .paginate(db, ANSWERS_PER_PAGE);
    let num_pages = paginator.num_pages().await?;
    let page_number = clamp_page(page, num_pages);
    let rows = paginator.fetch_page(page_number - 1).await?;

    let ids: Vec<i32> = rows.iter().map(|a| a.id).collect();
    let targets: Vec<Target> = ids.iter().map(|id| Target::answer(*id)).collect();
    let tallies = score::count_for_kind(db, TargetKind::Answer, &ids).await?;
    let states = vote::votes_for_user(db, viewer_id, &targets).await?;

    let items = rows
        .into_iter()
        .map(|answer| {
            let tally = tallies.get(&answer.id).copied().unwrap_or_default();
            let user_vote = states
                .get(&Target::answer(answer.id))
                .copied()
                .unwrap_or(0);
            AnswerForList {
                upvotes: tally.upvotes,
                downvotes: tally.downvotes,
                user_vote,
                answer,
            }
        })
        .collect();

    Ok(Page::new(items, page_number, num_pages))
}

/// The answer-detail composition: the answer's own vote context plus one
/// page of top-level comments with complete reply subtrees.
pub async fn answer_detail(
    db: &DatabaseConnection,
    answer_id: i32,
    viewer_id: Option<i32>,
    page: Option<u64>,
) -> Result<AnswerDetail, ForumError> {
    let answer = answers::Entity::find_by_id(answer_id)
        .one(db)
        .await?
        .ok_or(ForumError::NotFound(TargetKind::Answer))?;

    let target = Target::answer(answer.id);
    let tally = score::count_for_target(db, target).await?;
    let user_vote = vote::votes_for_user(db, viewer_id, &[target])
        .await?
        .remove(&target)
        .unwrap_or(0);
    let comments = comment::comment_page(db, target, viewer_id, page).await?;

    Ok(AnswerDetail {
        answer: AnswerForList {
            upvotes: tally.upvotes,
            downvotes: tally.downvotes,
            user_vote,
            answer,
        },
        comments,
    })
}

/// Posts an answer to a question.
pub async fn create_answer(
    db: &DatabaseConnection,
    author_id: i32,
    question_id: i32,
    data: NewAnswerData,
) -> Result<answers::Model, ForumError> {
    let content = data.content.trim();
    if content.is_empty() {
        return Err(ForumError::Validation(
            "Answer content must not be empty.".to_owned(),
        ));
    }

    if questions::Entity::find_by_id(question_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(ForumError::NotFound(TargetKind::Question));
    }

    let now = Utc::now().naive_utc();
    let answer = answers::ActiveModel {
        question_id: Set(question_id),
        user_id: Set(author_id),
        content: Set(content.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(answer)
}
