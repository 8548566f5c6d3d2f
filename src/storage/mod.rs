mod error;
mod page;
mod post;
pub mod sqlite;
pub mod traits;
mod user;

pub use error::{StorageError, StorageResult};
pub use page::{Page, PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use sqlite::SqliteStorage;
pub use traits::{
    Post, PostChanges, PostRepository, Storage, User, UserChanges, UserRepository,
};
