//! Document model for JSON2Video movies.
//!
//! Builds the declarative movie description (movie, scenes, elements) that
//! the rendering service consumes. Everything here is in-memory; the HTTP
//! side lives in `json2video-client`.

pub mod container;
pub mod error;
pub mod movie;
pub mod property;
pub mod scene;

pub use container::PropertyContainer;
pub use error::CoreError;
pub use movie::Movie;
pub use property::{MovieProperty, PropertySet, SceneProperty};
pub use scene::Scene;
