use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{Comment, Post, User};

/// User document as stored in the collection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub created_at: bson::DateTime,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
    pub last_up_vote: bson::DateTime,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub created_at: bson::DateTime,
    pub first_name: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub created_at: bson::DateTime,
    pub user_id: ObjectId,
    pub first_name: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<CommentDocument>,
    #[serde(default)]
    pub up_votes: Vec<String>,
}

pub fn to_bson_datetime(t: OffsetDateTime) -> bson::DateTime {
    bson::DateTime::from_millis((t.unix_timestamp_nanos() / 1_000_000) as i64)
}

pub fn from_bson_datetime(t: bson::DateTime) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(t.timestamp_millis()) * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

impl From<UserDocument> for User {
    fn from(d: UserDocument) -> Self {
        Self {
            id: d.id,
            email: d.email,
            first_name: d.first_name,
            last_name: d.last_name,
            password: d.password,
            created_at: from_bson_datetime(d.created_at),
            last_up_vote: from_bson_datetime(d.last_up_vote),
        }
    }
}

impl From<&User> for UserDocument {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            created_at: to_bson_datetime(u.created_at),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            password: u.password.clone(),
            last_up_vote: to_bson_datetime(u.last_up_vote),
        }
    }
}

#[cfg(test)]
impl From<CommentDocument> for Comment {
    fn from(d: CommentDocument) -> Self {
        Self {
            id: d.id,
            created_at: from_bson_datetime(d.created_at),
            first_name: d.first_name,
            content: d.content,
        }
    }
}

impl From<&Comment> for CommentDocument {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id,
            created_at: to_bson_datetime(c.created_at),
            first_name: c.first_name.clone(),
            content: c.content.clone(),
        }
    }
}

#[cfg(test)]
impl From<PostDocument> for Post {
    fn from(d: PostDocument) -> Self {
        Self {
            id: d.id,
            created_at: from_bson_datetime(d.created_at),
            user_id: d.user_id,
            first_name: d.first_name,
            title: d.title,
            content: d.content,
            comments: d.comments.into_iter().map(Comment::from).collect(),
            up_votes: d.up_votes,
        }
    }
}

impl From<&Post> for PostDocument {
    fn from(p: &Post) -> Self {
        Self {
            id: p.id,
            created_at: to_bson_datetime(p.created_at),
            user_id: p.user_id,
            first_name: p.first_name.clone(),
            title: p.title.clone(),
            content: p.content.clone(),
            comments: p.comments.iter().map(CommentDocument::from).collect(),
            up_votes: p.up_votes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use mongodb::bson::doc;
    use time::macros::datetime;

    #[test]
    fn datetime_conversion_keeps_millisecond_precision() {
        let t = datetime!(2024-03-05 10:20:30.123 UTC);
        assert_eq!(from_bson_datetime(to_bson_datetime(t)), t);
    }

    #[test]
    fn user_document_uses_stored_field_names() {
        let user = NewUser {
            email: "a@b.com".into(),
            first_name: "Ada".into(),
            last_name: "L".into(),
            password: "p".into(),
            created_at: datetime!(2024-01-01 12:00 UTC),
            last_up_vote: datetime!(2024-01-01 11:59 UTC),
        }
        .with_id(ObjectId::new());

        let stored = bson::to_document(&UserDocument::from(&user)).unwrap();
        assert_eq!(stored.get_object_id("_id").unwrap(), user.id);
        assert_eq!(stored.get_str("firstName").unwrap(), "Ada");
        assert!(stored.get_datetime("lastUpVote").is_ok());

        let back: User = bson::from_document::<UserDocument>(stored).unwrap().into();
        assert_eq!(back.email, user.email);
        assert_eq!(back.last_up_vote, user.last_up_vote);
    }

    #[test]
    fn post_document_defaults_missing_lists() {
        let owner = ObjectId::new();
        let raw = doc! {
            "_id": ObjectId::new(),
            "createdAt": bson::DateTime::now(),
            "userId": owner,
            "firstName": "Ada",
            "title": "t",
            "content": "c",
        };
        let post: Post = bson::from_document::<PostDocument>(raw).unwrap().into();
        assert_eq!(post.user_id, owner);
        assert!(post.comments.is_empty());
        assert!(post.up_votes.is_empty());
    }
}
