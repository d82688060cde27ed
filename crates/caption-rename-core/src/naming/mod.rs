//! Filename generation: caption sanitization and collision resolution.

pub mod collision;
pub mod sanitize;

pub use collision::CollisionPolicy;
pub use sanitize::sanitize;
