//! A Whitted-style raycaster: renders a JSON scene description of spheres,
//! planes and point/spot lights into a raster image using per-pixel primary
//! rays, hard shadow tests and diffuse/specular local shading.

pub mod geometry;
pub mod ppm;
pub mod render;
pub mod scene;
pub mod shading;

pub use ppm::{PixelBuffer, PpmFormat};
pub use render::{render, LightMixing, RenderError};
pub use scene::{Scene, SceneError};
