/// Painter3D Core Library - software transform, shading and ordering pipeline
///
/// This library provides the single-mesh, single-light fixed-function pipeline:
/// model rotation, translation, back-face culling, flat diffuse shading,
/// perspective projection, screen mapping and painter's-algorithm ordering.
/// Mesh loading (OBJ, STL) lives here too; windowing and rasterization do not.

pub mod config;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod matrix;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod shading;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{MeshError, PipelineError};
pub use geometry::{Color, Mesh, Triangle};
pub use matrix::Mat4;
pub use pipeline::Pipeline;
pub use projection::{DrawTriangle, Viewport};
pub use transform::Animation;
