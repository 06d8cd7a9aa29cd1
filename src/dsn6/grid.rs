//! Dense voxel grid reconstruction from DSN6 blocked storage.
//!
//! The payload stores samples as consecutive 8x8x8 sub-blocks covering the
//! full extents. Blocks at the high edges of a non-multiple-of-8 grid are
//! written in full anyway, so the reader must skip their padding bytes to
//! stay aligned with the stream.

use crate::dsn6::header::Dsn6Header;
use crate::error::{Error, Result};
use ndarray::Array3;

/// Decoded scalar grid of extent_x * extent_y * extent_z samples.
///
/// Samples are stored flat in x-major order:
/// `idx = (x * ny + y) * nz + z`. Fully populated on construction and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    extent: [usize; 3],
    values: Vec<f32>,
}

impl DensityGrid {
    /// De-interleave the blocked payload of `bytes` into a dense grid.
    ///
    /// `bytes` is the whole map buffer, already byte-order-normalised by
    /// [`Dsn6Header::from_bytes`]; the payload starts at byte
    /// [`Dsn6Header::SIZE`]. Each consumed byte is rescaled as
    /// `(byte - summand) / divisor`.
    pub fn from_blocks(bytes: &[u8], header: &Dsn6Header) -> Result<Self> {
        let payload = bytes.get(Dsn6Header::SIZE..).ok_or_else(|| {
            Error::TruncatedData(format!(
                "no payload after the {}-byte header",
                Dsn6Header::SIZE
            ))
        })?;

        let edge = Dsn6Header::BLOCK_EDGE;
        let [nx, ny, nz] = header.extent.map(|n| n as usize);
        let [bx, by, bz] = header.block_counts();
        let summand = header.summand as f32;
        let divisor = header.divisor;

        let mut values = vec![0.0f32; header.num_voxels()];
        let mut offset = 0usize;

        for zz in 0..bz {
            for yy in 0..by {
                for xx in 0..bx {
                    for k in 0..edge {
                        let z = zz * edge + k;
                        for j in 0..edge {
                            let y = yy * edge + j;
                            for i in 0..edge {
                                let x = xx * edge + i;
                                if x < nx && y < ny && z < nz {
                                    let raw = *payload.get(offset).ok_or_else(|| {
                                        Error::TruncatedData(format!(
                                            "payload ended at byte {offset} with samples \
                                             remaining for extents {nx}x{ny}x{nz}"
                                        ))
                                    })?;
                                    offset += 1;
                                    values[(x * ny + y) * nz + z] =
                                        (f32::from(raw) - summand) / divisor;
                                } else {
                                    // Padding for a truncated edge block: the
                                    // writer emits the full row regardless, so
                                    // consumed + skipped is always 8.
                                    offset += edge - i;
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(Self {
            extent: [nx, ny, nz],
            values,
        })
    }

    /// Grid extents (x, y, z).
    pub fn extent(&self) -> [usize; 3] {
        self.extent
    }

    /// Number of samples in the grid.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grid holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat x-major sample slice.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sample at grid coordinates (x, y, z).
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside the grid extents.
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        let [_, ny, nz] = self.extent;
        self.values[(x * ny + y) * nz + z]
    }

    /// Copy the grid into an `Array3<f32>` of shape (nx, ny, nz).
    pub fn to_ndarray(&self) -> Array3<f32> {
        let [nx, ny, nz] = self.extent;
        Array3::from_shape_vec((nx, ny, nz), self.values.clone())
            .expect("flat sample count matches grid extents")
    }
}
