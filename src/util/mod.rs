pub mod logger;
mod math;

pub use math::bounds::{Bounds, Transform};
pub use math::helpers;
pub use math::vec3d::Vec3D;
