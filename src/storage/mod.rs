use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{NewPost, NewUser, Post, User, UserUpdate};

#[cfg(test)]
pub mod memory;
pub mod mongo;
mod repo_types;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Persistence gateway for user and post documents.
///
/// Every method is a single-document (or single-filter) operation; the store's
/// per-document atomicity is the only concurrency guarantee. Ids are generated
/// here, at insert time.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_all_users(&self) -> Result<Vec<User>, StoreError>;
    /// Returns the number of matched documents.
    async fn update_user(&self, id: ObjectId, update: &UserUpdate) -> Result<u64, StoreError>;
    /// Returns the number of deleted documents.
    async fn delete_user(&self, id: ObjectId) -> Result<u64, StoreError>;
    async fn delete_all_users(&self) -> Result<u64, StoreError>;
    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError>;
}
