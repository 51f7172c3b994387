//! B-spline evaluation and decomposition into Bezier segments.

pub mod bspline;
pub mod deboor;
pub mod decompose;
pub mod knot;

pub use bspline::BSpline;
pub use deboor::{curve_derivative, curve_point, curve_tangent, nurbs_curve_point, nurbs_curve_tangent};
pub use decompose::{cubic_segments, decompose, quadratic_segments, Segment};
pub use knot::{basis_functions, find_span};
