use anyhow::Context;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Client, Collection,
};
use tracing::{debug, info};

use super::{
    repo_types::{PostDocument, UserDocument},
    DocumentStore, StoreError,
};
use crate::{
    config::MongoConfig,
    models::{NewPost, NewUser, Post, User, UserUpdate},
};

#[derive(Clone)]
pub struct MongoStore {
    users: Collection<UserDocument>,
    posts: Collection<PostDocument>,
}

impl MongoStore {
    /// Connects and pings the primary. Callers treat failure as fatal.
    pub async fn connect(cfg: &MongoConfig) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&cfg.uri)
            .await
            .context("connect to mongodb")?;
        let db = client.database(&cfg.database);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .context("ping mongodb")?;
        info!(database = %cfg.database, "mongodb connection established");

        Ok(Self {
            users: db.collection(&cfg.users_collection),
            posts: db.collection(&cfg.posts_collection),
        })
    }
}

/// Posts may share the users collection; only documents with an email are users.
fn users_only() -> Document {
    doc! { "email": { "$exists": true } }
}

fn user_by_id(id: ObjectId) -> Document {
    doc! { "_id": id, "email": { "$exists": true } }
}

fn set_document(update: &UserUpdate) -> Document {
    let mut set = Document::new();
    if let Some(v) = &update.first_name {
        set.insert("firstName", v.as_str());
    }
    if let Some(v) = &update.last_name {
        set.insert("lastName", v.as_str());
    }
    if let Some(v) = &update.email {
        set.insert("email", v.as_str());
    }
    if let Some(v) = &update.password {
        set.insert("password", v.as_str());
    }
    set
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = user.with_id(ObjectId::new());
        self.users.insert_one(UserDocument::from(&user), None).await?;
        debug!(user_id = %user.id, "user document inserted");
        Ok(user)
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        let found = self.users.find_one(user_by_id(id), None).await?;
        Ok(found.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let found = self.users.find_one(doc! { "email": email }, None).await?;
        Ok(found.map(User::from))
    }

    async fn find_all_users(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users.find(users_only(), None).await?;
        let docs: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, id: ObjectId, update: &UserUpdate) -> Result<u64, StoreError> {
        if update.is_empty() {
            // `$set: {}` is rejected by the server; report whether the target exists.
            let count = self
                .users
                .count_documents(user_by_id(id), None)
                .await?;
            return Ok(count);
        }
        let set = set_document(update);
        let result = self
            .users
            .update_one(user_by_id(id), doc! { "$set": set }, None)
            .await?;
        debug!(user_id = %id, matched = result.matched_count, modified = result.modified_count, "user document updated");
        Ok(result.matched_count)
    }

    async fn delete_user(&self, id: ObjectId) -> Result<u64, StoreError> {
        let result = self.users.delete_one(user_by_id(id), None).await?;
        Ok(result.deleted_count)
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        let result = self.users.delete_many(users_only(), None).await?;
        Ok(result.deleted_count)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let post = post.with_id(ObjectId::new());
        self.posts.insert_one(PostDocument::from(&post), None).await?;
        debug!(post_id = %post.id, user_id = %post.user_id, "post document inserted");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_document_contains_only_supplied_fields() {
        let update = UserUpdate {
            first_name: Some("Grace".into()),
            password: Some("new".into()),
            ..Default::default()
        };
        let set = set_document(&update);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_str("firstName").unwrap(), "Grace");
        assert_eq!(set.get_str("password").unwrap(), "new");
        assert!(set.get("email").is_none());
    }

    #[test]
    fn set_document_is_empty_for_empty_update() {
        assert!(set_document(&UserUpdate::default()).is_empty());
    }
}
