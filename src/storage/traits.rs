use serde::{Deserialize, Serialize};

use super::{
    error::StorageResult,
    page::{Page, PageRequest},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub like_count: i64,
}

/// Fields of a user to overwrite; `None` leaves the column untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Fields of a post to overwrite. The like counter is only moved by
/// [`PostRepository::like_post`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<i64>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author_id.is_none()
    }
}

pub trait UserRepository {
    fn create_user(&self, name: &str, email: &str) -> StorageResult<i64>;
    fn get_user_by_id(&self, id: i64) -> StorageResult<Option<User>>;
    fn get_all_users(&self) -> StorageResult<Vec<User>>;
    /// Returns the number of rows changed; `0` means no such user.
    fn update_user(&self, id: i64, changes: &UserChanges) -> StorageResult<usize>;
    /// Returns the number of rows deleted. Posts of the user go with it.
    fn delete_user(&self, id: i64) -> StorageResult<usize>;
}

pub trait PostRepository {
    /// Author existence is enforced by the foreign key only.
    fn create_post(&self, title: &str, content: &str, author_id: i64) -> StorageResult<i64>;
    fn get_post_by_id(&self, id: i64) -> StorageResult<Option<Post>>;
    fn get_posts_by_user(&self, author_id: i64, page: PageRequest) -> StorageResult<Page<Post>>;
    fn get_all_posts(&self, page: PageRequest) -> StorageResult<Page<Post>>;
    fn update_post(&self, id: i64, changes: &PostChanges) -> StorageResult<usize>;
    fn delete_post(&self, id: i64) -> StorageResult<usize>;
    fn like_post(&self, id: i64) -> StorageResult<usize>;
}

pub trait Storage: UserRepository + PostRepository {}

impl<T: UserRepository + PostRepository> Storage for T {}
