//! curvekit geometry: planar parametric curves, arc-length parameterization,
//! and B-spline decomposition.

pub mod arc_length;
pub mod bezier;
pub mod curve;
pub mod nondegenerate;
pub mod nurbs;

pub use arc_length::{ArcLengthParameterization, Leaf};
pub use curve::{
    Arc, CubicSpline, Curve, EllipticalArc, ParametricCurve, QuadraticSpline,
    RationalCubicSpline, RationalQuadraticSpline, RationalSpline, Spline, Transformable,
};
pub use nondegenerate::Nondegenerate;
pub use nurbs::{BSpline, Segment};
