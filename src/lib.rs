//! # densrs
//!
//! Fast decoding of DSN6 electron-density maps for structural biology.
//!
//! The crate turns a raw map buffer into a dense 3D scalar grid plus the
//! affine transform that places the grid in real-space crystallographic
//! coordinates, ready for a volume renderer or isosurface extractor.
//!
//! ```no_run
//! use densrs::dsn6;
//!
//! let (header, grid) = dsn6::load("2fd7.dsn6", 1.0)?;
//! let affine = dsn6::compute_transform(&header)?;
//! println!("{:?} voxels, cell {:?}", grid.extent(), header.cell);
//! # Ok::<(), densrs::Error>(())
//! ```

pub mod dsn6;
pub mod error;

pub use error::{Error, Result};
