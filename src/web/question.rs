use crate::client::ClientCtx;
use crate::db::get_db_pool;
use crate::error::ForumError;
use crate::question::{self, NewQuestionData, QuestionOrder};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_question).service(view_questions);
}

#[derive(Deserialize)]
pub struct QuestionListQuery {
    pub page: Option<u64>,
    #[serde(default)]
    pub sort: QuestionOrder,
}

#[post("/questions")]
pub async fn post_question(
    client: ClientCtx,
    form: web::Form<NewQuestionData>,
) -> Result<impl Responder, ForumError> {
    let author_id = client.require_id()?;

    let question = question::create_question(get_db_pool(), author_id, form.into_inner()).await?;

    Ok(HttpResponse::Created().json(question))
}

#[get("/questions")]
pub async fn view_questions(
    client: ClientCtx,
    query: web::Query<QuestionListQuery>,
) -> Result<impl Responder, ForumError> {
    let query = query.into_inner();
    let page = question::question_page(get_db_pool(), client.get_id(), query.sort, query.page).await?;

    Ok(HttpResponse::Ok().json(page))
}
