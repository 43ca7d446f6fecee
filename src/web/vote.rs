use crate::client::ClientCtx;
use crate::db::get_db_pool;
use crate::error::ForumError;
use crate::target::{Target, TargetKind};
use crate::vote;
use actix_web::{post, web, HttpResponse, Responder};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(cast_vote);
}

#[derive(Deserialize)]
pub struct VoteFormData {
    pub vote_type: i16,
}

#[post("/votes/{kind}/{object_id}")]
pub async fn cast_vote(
    client: ClientCtx,
    path: web::Path<(String, i32)>,
    form: web::Form<VoteFormData>,
) -> Result<impl Responder, ForumError> {
    let voter_id = client.require_id()?;

    let (kind, object_id) = path.into_inner();
    let kind = TargetKind::from_slug(&kind)
        .ok_or_else(|| ForumError::Validation("Invalid target type.".to_owned()))?;

    let outcome = vote::cast(
        get_db_pool(),
        voter_id,
        Target {
            kind,
            id: object_id,
        },
        form.vote_type,
    )
    .await?;

    Ok(HttpResponse::Ok().json(outcome))
}
