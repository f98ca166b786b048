//! Types shared between the window manager core and its backends.

pub mod geometry;

pub use geometry::Geometry;
