use crate::answer::{self, NewAnswerData};
use crate::client::ClientCtx;
use crate::db::get_db_pool;
use crate::error::ForumError;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_answer)
        .service(view_answers)
        .service(view_answer);
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

#[post("/questions/{question_id}/answers")]
pub async fn post_answer(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Form<NewAnswerData>,
) -> Result<impl Responder, ForumError> {
    let author_id = client.require_id()?;

    let answer = answer::create_answer(
        get_db_pool(),
        author_id,
        path.into_inner(),
        form.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(answer))
}

#[get("/questions/{question_id}/answers")]
pub async fn view_answers(
    client: ClientCtx,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, ForumError> {
    let page = answer::answer_page(
        get_db_pool(),
        path.into_inner(),
        client.get_id(),
        query.page,
    )
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

#[get("/answers/{answer_id}")]
pub async fn view_answer(
    client: ClientCtx,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, ForumError> {
    let detail = answer::answer_detail(
        get_db_pool(),
        path.into_inner(),
        client.get_id(),
        query.page,
    )
    .await?;

    Ok(HttpResponse::Ok().json(detail))
}
