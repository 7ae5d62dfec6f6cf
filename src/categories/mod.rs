pub mod model;
pub mod store;

pub use model::{Category, CategoryPayload, CategoryRef, MAX_CATEGORY_NAME_LEN};
pub use store::CategoryStore;
