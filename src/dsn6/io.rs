//! DSN6 parsing entry points.

use crate::dsn6::grid::DensityGrid;
use crate::dsn6::header::Dsn6Header;
use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Decode a complete DSN6 map from an in-memory buffer.
///
/// `bytes` must hold the 512-byte header followed by the blocked voxel
/// payload. If the map was written in the opposite byte order the buffer is
/// byte-swapped in place (see [`Dsn6Header::from_bytes`]); callers that
/// need the original bytes afterwards should pass a copy.
///
/// `voxel_size` converts cell lengths into the caller's linear unit
/// (`1.0` keeps Angstrom).
pub fn parse(bytes: &mut [u8], voxel_size: f32) -> Result<(Dsn6Header, DensityGrid)> {
    let header = Dsn6Header::from_bytes(bytes, voxel_size)?;
    let grid = DensityGrid::from_blocks(bytes, &header)?;
    Ok((header, grid))
}

/// Load and decode a DSN6 map file.
pub fn load<P: AsRef<Path>>(path: P, voxel_size: f32) -> Result<(Dsn6Header, DensityGrid)> {
    let mut bytes = std::fs::read(path)?;
    parse(&mut bytes, voxel_size)
}

/// Read only the header of a DSN6 map file.
///
/// Useful for inspecting extents and cell geometry without decoding the
/// voxel payload.
pub fn load_header<P: AsRef<Path>>(path: P, voxel_size: f32) -> Result<Dsn6Header> {
    let mut file = File::open(path)?;
    let mut bytes = vec![0u8; Dsn6Header::SIZE];
    file.read_exact(&mut bytes)?;
    Dsn6Header::from_bytes(&mut bytes, voxel_size)
}
