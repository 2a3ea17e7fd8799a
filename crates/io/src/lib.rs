// File I/O: point parsing, file discovery, output projection

pub mod discover;
pub mod error;
pub mod output;
pub mod points;
pub mod reference;
pub mod text;

pub use error::PointIoError;
