// Common types shared across the catalog domain and the HTTP layer

pub mod entity_ids;
pub mod id;
pub mod pagination;

pub use entity_ids::*;
pub use pagination::{PageArgs, PageError, PageLimits, PageWindow};
