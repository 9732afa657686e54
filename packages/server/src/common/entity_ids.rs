//! Typed ID definitions for catalog entities.

pub use super::id::Id;

/// Marker type for catalog resources (games, apps, tools).
pub struct Resource;

/// Marker type for categories.
pub struct Category;

pub type ResourceId = Id<Resource>;

pub type CategoryId = Id<Category>;
