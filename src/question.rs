use crate::error::ForumError;
use crate::orm::questions;
use crate::pagination::{paginate, Page};
use crate::score::{self, Ranked, VoteTally};
use crate::target::{Target, TargetKind};
use crate::vote;
use chrono::prelude::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection};
use serde::{Deserialize, Serialize};

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Listing order. `Recent` is the default; the rest rank by the
/// aggregator's sort helpers with a newest-first tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionOrder {
    #[default]
    Recent,
    Top,
    Upvoted,
    Downvoted,
}

/// A question row annotated for list rendering.
#[derive(Debug, Serialize)]
pub struct QuestionForList {
    pub question: questions::Model,
    pub upvotes: i64,
    pub downvotes: i64,
    pub net_score: i64,
    pub user_vote: i16,
}

impl Ranked for QuestionForList {
    fn tally(&self) -> VoteTally {
        VoteTally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    fn created_at(&self) -> chrono::NaiveDateTime {
        self.question.created_at
    }
}

#[derive(Debug, Deserialize)]
pub struct NewQuestionData {
    pub title: String,
    pub description: String,
}

/// One page of questions annotated with counts, net score and the
/// viewer's vote. Vote-ranked orderings need every row's tally, so the
/// ranking and the page cut happen in memory over the annotated list.
pub async fn question_page(
    db: &DatabaseConnection,
    viewer_id: Option<i32>,
    order: QuestionOrder,
    page: Option<u64>,
) -> Result<Page<QuestionForList>, ForumError> {
    let rows = questions::Entity::find()
        .order_by_desc(questions::Column::CreatedAt)
        .all(db)
        .await?;

    let ids: Vec<i32> = rows.iter().map(|q| q.id).collect();
    let targets: Vec<Target> = ids.iter().map(|id| Target::question(*id)).collect();
    let tallies = score::count_for_kind(db, TargetKind::Question, &ids).await?;
    let states = vote::votes_for_user(db, viewer_id, &targets).await?;

    let mut list: Vec<QuestionForList> = rows
        .into_iter()
        .map(|question| {
            let tally = tallies.get(&question.id).copied().unwrap_or_default();
            let user_vote = states
                .get(&Target::question(question.id))
                .copied()
                .unwrap_or(0);
            QuestionForList {
                upvotes: tally.upvotes,
                downvotes: tally.downvotes,
                net_score: tally.net_score(),
                user_vote,
                question,
            }
        })
        .collect();

    match order {
        // Rows arrive newest first from the query.
        QuestionOrder::Recent => {}
        QuestionOrder::Top => score::sort_by_net_score(&mut list),
        QuestionOrder::Upvoted => score::sort_by_upvotes(&mut list),
        QuestionOrder::Downvoted => score::sort_by_downvotes(&mut list),
    }

    Ok(paginate(list, page, QUESTIONS_PER_PAGE))
}

/// Posts a question.
pub async fn create_question(
    db: &DatabaseConnection,
    author_id: i32,
    data: NewQuestionData,
) -> Result<questions::Model, ForumError> {
    let title = data.title.trim();
    if title.is_empty() {
        return Err(ForumError::Validation(
            "Question title must not be empty.".to_owned(),
        ));
    }
    let description = data.description.trim();
    if description.is_empty() {
        return Err(ForumError::Validation(
            "Question description must not be empty.".to_owned(),
        ));
    }

    let now = Utc::now().naive_utc();
    let question = questions::ActiveModel {
        title: Set(title.to_owned()),
        description: Set(description.to_owned()),
        user_id: Set(author_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(question)
}
