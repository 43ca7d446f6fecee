use crate::error::ForumError;
use crate::orm::{answers, comments, questions};
use sea_orm::entity::prelude::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::fmt;

/// The closed set of content kinds a vote or comment can attach to.
/// Stored on vote and comment rows as a short string tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[sea_orm(string_value = "question")]
    Question,
    #[sea_orm(string_value = "answer")]
    Answer,
    #[sea_orm(string_value = "comment")]
    Comment,
}

impl TargetKind {
    /// Parses the URL form of the tag, as in `/votes/{kind}/{object_id}`.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "question" => Some(TargetKind::Question),
            "answer" => Some(TargetKind::Answer),
            "comment" => Some(TargetKind::Comment),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetKind::Question => "Question",
            TargetKind::Answer => "Answer",
            TargetKind::Comment => "Comment",
        })
    }
}

/// A `(kind, id)` reference to any votable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    pub kind: TargetKind,
    pub id: i32,
}

impl Target {
    pub fn question(id: i32) -> Self {
        Self {
            kind: TargetKind::Question,
            id,
        }
    }

    pub fn answer(id: i32) -> Self {
        Self {
            kind: TargetKind::Answer,
            id,
        }
    }

    pub fn comment(id: i32) -> Self {
        Self {
            kind: TargetKind::Comment,
            id,
        }
    }
}

/// Confirms the referenced row exists before a vote or comment touches it.
pub async fn resolve(db: &DatabaseConnection, target: Target) -> Result<(), ForumError> {
    let found = match target.kind {
        TargetKind::Question => questions::Entity::find_by_id(target.id)
            .one(db)
            .await?
            .is_some(),
        TargetKind::Answer => answers::Entity::find_by_id(target.id)
            .one(db)
            .await?
            .is_some(),
        TargetKind::Comment => comments::Entity::find_by_id(target.id)
            .one(db)
            .await?
            .is_some(),
    };

    if found {
        Ok(())
    } else {
        Err(ForumError::NotFound(target.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for kind in [TargetKind::Question, TargetKind::Answer, TargetKind::Comment] {
            let slug = kind.to_string().to_lowercase();
            assert_eq!(TargetKind::from_slug(&slug), Some(kind));
        }
        assert_eq!(TargetKind::from_slug("thread"), None);
        assert_eq!(TargetKind::from_slug(""), None);
    }
}
