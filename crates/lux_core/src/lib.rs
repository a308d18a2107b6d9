//! Lux core scene data.
//!
//! Renderer-agnostic geometry and appearance inputs: indexed triangle
//! meshes, binary STL ingestion and textures.

pub mod mesh;
pub mod stl;
pub mod texture;

pub use mesh::Mesh;
pub use stl::{load_binary_stl, parse_binary_stl, StlError, StlResult};
pub use texture::Texture;
