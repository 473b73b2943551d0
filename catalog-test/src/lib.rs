mod app;
mod db;

pub use app::{resolve_path, TestApp, TestRequest, TestResponse};
pub use db::{test_pool, TEST_DATABASE_ENV};
