pub mod bounds;
pub mod helpers;
pub mod vec3d;
