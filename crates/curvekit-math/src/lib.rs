pub mod aabb;
pub mod axis;
pub mod frame;
pub mod interval;
pub mod transform;
pub mod vector_box;

pub use glam::{dvec2, dvec3, DAffine2, DMat2, DVec2, DVec3, DVec4};
pub use aabb::Aabb2;
pub use axis::Axis2d;
pub use frame::Frame2d;
pub use interval::Interval;
pub use transform::Transform2;
pub use vector_box::{VectorBox, VectorBox2, VectorBox3, VectorBox4};

pub type Point2 = DVec2;
pub type Vector2 = DVec2;
/// Homogeneous planar point `(w·x, w·y, w)`.
pub type Homogeneous2 = DVec3;
