use crate::error::ForumError;
use actix_utils::future::{ok, Ready};
use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{Error, FromRequest, HttpRequest};

/// Header carrying the authenticated account id, set by the fronting
/// auth layer. Absence means a guest.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Request identity as supplied by the surrounding infrastructure.
/// This subsystem never authenticates; it only reads what the edge
/// forwarded.
#[derive(Clone, Debug, Default)]
pub struct ClientCtx {
    user_id: Option<i32>,
}

impl ClientCtx {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i32>().ok());
        Self { user_id }
    }

    /// Returns either the user's id or None.
    pub fn get_id(&self) -> Option<i32> {
        self.user_id
    }

    pub fn is_user(&self) -> bool {
        self.user_id.is_some()
    }

    /// The id, or `Unauthorized` so the caller can route to authentication.
    pub fn require_id(&self) -> Result<i32, ForumError> {
        self.user_id.ok_or(ForumError::Unauthorized)
    }
}

impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ok(Self::from_headers(req.headers()))
    }
}
