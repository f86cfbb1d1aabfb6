//! Persisted questionnaire profiles.
//!
//! [`ProfileStore`] is the only component that touches the profile table;
//! everything else reads and writes through it.

pub mod cache;
pub mod model;
pub mod store;
pub mod table;

pub use cache::ProfileCache;
pub use model::{City, Description, PhotoRef, Profile, ProfileField, UserId, UNSPECIFIED_CITY};
pub use store::ProfileStore;
