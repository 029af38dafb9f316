pub mod animation;
pub mod camera;
pub mod gpu;
pub mod lighting;
pub mod material;
pub mod params;
pub mod scene;
pub mod surface;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
