use mongodb::bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string};
use serde::Serialize;
use time::OffsetDateTime;

/// Registered account. `id` is assigned by the store on insert and never changes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String, // verbatim or argon2 PHC string, depending on scheme
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_up_vote: OffsetDateTime,
}

/// User fields before the store has assigned an id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub created_at: OffsetDateTime,
    pub last_up_vote: OffsetDateTime,
}

impl NewUser {
    pub fn with_id(self, id: ObjectId) -> User {
        User {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password: self.password,
            created_at: self.created_at,
            last_up_vote: self.last_up_vote,
        }
    }
}

/// Sparse update: `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.password.is_none()
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub first_name: String,
    pub content: String,
}

/// A post. `id` is the store-assigned document id; `user_id` is the author.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub user_id: ObjectId,
    pub first_name: String,
    pub title: String,
    pub content: String,
    pub comments: Vec<Comment>,
    pub up_votes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub created_at: OffsetDateTime,
    pub user_id: ObjectId,
    pub first_name: String,
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn with_id(self, id: ObjectId) -> Post {
        Post {
            id,
            created_at: self.created_at,
            user_id: self.user_id,
            first_name: self.first_name,
            title: self.title,
            content: self.content,
            comments: Vec::new(),
            up_votes: Vec::new(),
        }
    }
}
