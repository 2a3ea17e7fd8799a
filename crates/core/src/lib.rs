//! `pointfix-core`: point types shared by the matcher, I/O and CLI crates.

pub mod point;

pub use point::{format_coordinate, Point};
