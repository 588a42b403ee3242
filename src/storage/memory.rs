use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::{DocumentStore, StoreError};
use crate::models::{NewPost, NewUser, Post, User, UserUpdate};

/// In-process store used by handler tests.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
    unavailable: AtomicBool,
    drop_deletes: AtomicBool,
}

impl MemoryStore {
    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    /// Every following call fails as if the database connection was lost.
    pub fn set_unavailable(&self, on: bool) {
        self.unavailable.store(on, Ordering::SeqCst);
    }

    /// `delete_user` reports zero removed documents without touching data.
    pub fn set_drop_deletes(&self, on: bool) {
        self.drop_deletes.store(on, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(mongodb::error::Error::custom(
                "connection reset by peer",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.check()?;
        let user = user.with_id(ObjectId::new());
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all_users(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_user(&self, id: ObjectId, update: &UserUpdate) -> Result<u64, StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                update.apply_to(user);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_user(&self, id: ObjectId) -> Result<u64, StoreError> {
        self.check()?;
        if self.drop_deletes.load(Ordering::SeqCst) {
            return Ok(0);
        }
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let removed = users.len() as u64;
        users.clear();
        Ok(removed)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError> {
        self.check()?;
        let post = post.with_id(ObjectId::new());
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }
}
