use async_trait::async_trait;

use super::task::TaskList;
use crate::error::StorageError;

#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> Result<(), StorageError>;
    async fn load(&self) -> TaskList;
    async fn save(&self, tasks: &TaskList) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: TaskRepository + ?Sized> TaskRepository for Box<T> {
    async fn init(&self) -> Result<(), StorageError> { (**self).init().await }
    async fn load(&self) -> TaskList { (**self).load().await }
    async fn save(&self, tasks: &TaskList) -> Result<(), StorageError> { (**self).save(tasks).await }
}
