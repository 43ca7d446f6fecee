use crate::client::ClientCtx;
use crate::comment::{self, NewCommentData};
use crate::db::get_db_pool;
use crate::error::ForumError;
use crate::target::Target;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_comment)
        .service(view_comments)
        .service(update_comment)
        .service(destroy_comment);
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

#[derive(Deserialize)]
pub struct CommentFormData {
    pub content: String,
}

#[post("/answers/{answer_id}/comments")]
pub async fn post_comment(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Form<NewCommentData>,
) -> Result<impl Responder, ForumError> {
    let author_id = client.require_id()?;

    let comment = comment::create_comment(
        get_db_pool(),
        author_id,
        Target::answer(path.into_inner()),
        form.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(comment))
}

#[get("/answers/{answer_id}/comments")]
pub async fn view_comments(
    client: ClientCtx,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, ForumError> {
    let page = comment::comment_page(
        get_db_pool(),
        Target::answer(path.into_inner()),
        client.get_id(),
        query.page,
    )
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

#[post("/comments/{comment_id}/edit")]
pub async fn update_comment(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Form<CommentFormData>,
) -> Result<impl Responder, ForumError> {
    let actor_id = client.require_id()?;

    let comment = comment::update_comment(
        get_db_pool(),
        actor_id,
        path.into_inner(),
        form.into_inner().content,
    )
    .await?;

    Ok(HttpResponse::Ok().json(comment))
}

#[post("/comments/{comment_id}/delete")]
pub async fn destroy_comment(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, ForumError> {
    let actor_id = client.require_id()?;

    comment::delete_comment(get_db_pool(), actor_id, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
