//! DSN6 electron-density map support.
//!
//! DSN6 is a blocked binary format for crystallographic electron-density
//! maps, historically produced for the O and FRODO model-building programs
//! and still emitted by map servers today. A map is a 512-byte packed
//! header of 16-bit words followed by voxel samples stored as 8x8x8
//! sub-blocks, one unsigned byte per sample.
//!
//! Decoding yields a [`Dsn6Header`], a dense [`DensityGrid`], and (via
//! [`compute_transform`]) the 4x4 affine placing grid indices into
//! real-space Cartesian coordinates.

pub(crate) mod grid;
pub(crate) mod header;
pub mod io;
mod transform;

pub use grid::DensityGrid;
pub use header::Dsn6Header;
pub use io::{load, load_header, parse};
pub use transform::{compute_transform, grid_basis};
