use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::space::{Space, SpaceState};

/// Catalog of spaces as seen from inside one unit of work.
#[async_trait]
pub trait SpaceStore: Send {
    async fn get_by_code(&mut self, code: &str) -> AppResult<Option<Space>>;
    // ordered by id
    async fn list_all(&mut self) -> AppResult<Vec<Space>>;
    // fails with EntityNotFound when no space has this code
    async fn set_state(&mut self, code: &str, state: SpaceState) -> AppResult<()>;
    // inserts a Free space unless the code is already present; returns the stored record
    async fn provision(&mut self, code: &str) -> AppResult<Space>;
}
