//! ClickUp HTTP adapter.

mod gateway;

pub use gateway::{ClickUpGateway, DEFAULT_API_BASE_URL, task_url};
