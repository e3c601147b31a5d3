pub mod gpu;
pub mod msaa;
pub mod textures;
pub mod types;
