pub mod error;
pub mod page;

pub use error::DataError;
pub use page::{Page, PageMeta, Pageable};
