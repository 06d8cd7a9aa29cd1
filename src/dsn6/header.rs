//! DSN6 header parsing and representation.
//!
//! The header occupies the first 512 bytes of the file as a sequence of
//! signed 16-bit words. Only the first 19 words carry data; the remainder
//! of the block is padding. Byte order is detected from the endianness
//! marker word and normalised before any field is read.

use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Header word indices (16-bit words, so byte offset = 2 * index).
mod words {
    pub const X_START: usize = 0;
    pub const Y_START: usize = 1;
    pub const Z_START: usize = 2;
    pub const X_EXTENT: usize = 3;
    pub const Y_EXTENT: usize = 4;
    pub const Z_EXTENT: usize = 5;
    pub const X_RATE: usize = 6;
    pub const Y_RATE: usize = 7;
    pub const Z_RATE: usize = 8;
    pub const CELL_A: usize = 9;
    pub const CELL_B: usize = 10;
    pub const CELL_C: usize = 11;
    pub const ALPHA: usize = 12;
    pub const BETA: usize = 13;
    pub const GAMMA: usize = 14;
    pub const DIVISOR: usize = 15;
    pub const SUMMAND: usize = 16;
    pub const SCALE_DENOM: usize = 17;
    pub const ENDIAN_MARKER: usize = 18;
}

/// Value of the endianness marker word when the buffer byte order matches
/// the decoder's base (little-endian) interpretation.
const NATIVE_MARKER: i16 = 100;

/// Decoded DSN6 map header.
///
/// Immutable once decoded. Derived fields (`cell`, `angles`, `divisor`) are
/// already scaled by the header's own scale denominator, so consumers never
/// see the raw fixed-point words.
#[derive(Debug, Clone, PartialEq)]
pub struct Dsn6Header {
    /// Grid origin offsets (x, y, z) in grid-index units.
    pub origin: [i32; 3],
    /// Number of grid points along each axis, all positive.
    pub extent: [i32; 3],
    /// Grid divisions per full unit-cell repeat along each axis.
    pub rate: [i32; 3],
    /// Unit-cell edge lengths, scaled into the caller's linear unit.
    pub cell: [f32; 3],
    /// Unit-cell angles alpha/beta/gamma in degrees.
    pub angles: [f32; 3],
    /// Rescale divisor applied to every raw sample, non-zero.
    pub divisor: f32,
    /// Rescale summand subtracted from every raw sample.
    pub summand: i32,
    /// Whether the buffer was byte-swapped during decoding.
    pub swapped: bool,
}

impl Dsn6Header {
    /// Header size in bytes; the voxel payload starts at this offset.
    pub const SIZE: usize = 512;

    /// Edge length of the cubic storage blocks in the payload.
    pub const BLOCK_EDGE: usize = 8;

    /// Decode a header from the start of `bytes`, normalising byte order.
    ///
    /// If the endianness marker is not in the base order, every 16-bit word
    /// of the *entire* buffer (header and payload alike) is swapped in
    /// place before any field is read. The mutation is confined to the
    /// caller-owned buffer for this one decode; pass the same buffer on to
    /// [`DensityGrid::from_blocks`](crate::dsn6::DensityGrid::from_blocks)
    /// so the payload is read with a consistent word alignment.
    ///
    /// `voxel_size` is the unit-conversion factor for cell lengths, e.g.
    /// `1.0` to keep them in Angstrom.
    pub fn from_bytes(bytes: &mut [u8], voxel_size: f32) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(Error::MalformedHeader(format!(
                "header too short: got {} bytes, need {}",
                bytes.len(),
                Self::SIZE
            )));
        }

        let marker = read_word(bytes, words::ENDIAN_MARKER);
        let swapped = marker != NATIVE_MARKER;
        if swapped {
            swap_words(bytes);
            let marker = read_word(bytes, words::ENDIAN_MARKER);
            if marker != NATIVE_MARKER {
                return Err(Error::MalformedHeader(format!(
                    "endianness marker is {} in either byte order, expected {}",
                    marker, NATIVE_MARKER
                )));
            }
        }

        let origin = [
            i32::from(read_word(bytes, words::X_START)),
            i32::from(read_word(bytes, words::Y_START)),
            i32::from(read_word(bytes, words::Z_START)),
        ];
        let extent = [
            i32::from(read_word(bytes, words::X_EXTENT)),
            i32::from(read_word(bytes, words::Y_EXTENT)),
            i32::from(read_word(bytes, words::Z_EXTENT)),
        ];
        let rate = [
            i32::from(read_word(bytes, words::X_RATE)),
            i32::from(read_word(bytes, words::Y_RATE)),
            i32::from(read_word(bytes, words::Z_RATE)),
        ];

        for (axis, &n) in ["x", "y", "z"].iter().zip(&extent) {
            if n <= 0 {
                return Err(Error::MalformedHeader(format!(
                    "{axis} extent must be positive, got {n}"
                )));
            }
        }
        for (axis, &n) in ["x", "y", "z"].iter().zip(&rate) {
            if n <= 0 {
                return Err(Error::MalformedHeader(format!(
                    "{axis} map rate must be positive, got {n}"
                )));
            }
        }

        let denom = read_word(bytes, words::SCALE_DENOM);
        if denom == 0 {
            return Err(Error::MalformedHeader(
                "scale denominator is zero".to_string(),
            ));
        }
        let factor = 1.0 / f32::from(denom);
        let scaling = factor * voxel_size;

        let divisor = f32::from(read_word(bytes, words::DIVISOR)) / 100.0;
        if divisor == 0.0 {
            return Err(Error::MalformedHeader(
                "rescale divisor is zero".to_string(),
            ));
        }

        Ok(Self {
            origin,
            extent,
            rate,
            cell: [
                f32::from(read_word(bytes, words::CELL_A)) * scaling,
                f32::from(read_word(bytes, words::CELL_B)) * scaling,
                f32::from(read_word(bytes, words::CELL_C)) * scaling,
            ],
            angles: [
                f32::from(read_word(bytes, words::ALPHA)) * factor,
                f32::from(read_word(bytes, words::BETA)) * factor,
                f32::from(read_word(bytes, words::GAMMA)) * factor,
            ],
            divisor,
            summand: i32::from(read_word(bytes, words::SUMMAND)),
            swapped,
        })
    }

    /// Total number of grid samples declared by the extents.
    pub fn num_voxels(&self) -> usize {
        self.extent.iter().map(|&n| n as usize).product()
    }

    /// Number of 8-cubed storage blocks per axis.
    pub fn block_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for (count, &n) in counts.iter_mut().zip(&self.extent) {
            *count = (n as usize).div_ceil(Self::BLOCK_EDGE);
        }
        counts
    }

    /// Payload length in bytes implied by the extents (every block is
    /// written in full, padding included).
    pub fn payload_len(&self) -> usize {
        let block = Self::BLOCK_EDGE.pow(3);
        self.block_counts().iter().product::<usize>() * block
    }
}

fn read_word(bytes: &[u8], index: usize) -> i16 {
    LittleEndian::read_i16(&bytes[2 * index..2 * index + 2])
}

/// Swap every 16-bit word of the buffer in place. A trailing odd byte, if
/// any, is left untouched.
pub(crate) fn swap_words(bytes: &mut [u8]) {
    for pair in bytes.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};

    /// Build a 512-byte header with the given words, little-endian.
    fn header_bytes(fields: &[(usize, i16)]) -> Vec<u8> {
        let mut buf = vec![0u8; Dsn6Header::SIZE];
        for &(index, value) in fields {
            LittleEndian::write_i16(&mut buf[2 * index..2 * index + 2], value);
        }
        buf
    }

    fn valid_words() -> Vec<(usize, i16)> {
        vec![
            (words::X_START, -2),
            (words::Y_START, 3),
            (words::Z_START, 5),
            (words::X_EXTENT, 10),
            (words::Y_EXTENT, 12),
            (words::Z_EXTENT, 14),
            (words::X_RATE, 20),
            (words::Y_RATE, 24),
            (words::Z_RATE, 28),
            (words::CELL_A, 4000),
            (words::CELL_B, 4800),
            (words::CELL_C, 5600),
            (words::ALPHA, 7200),
            (words::BETA, 7200),
            (words::GAMMA, 7200),
            (words::DIVISOR, 250),
            (words::SUMMAND, 30),
            (words::SCALE_DENOM, 80),
            (words::ENDIAN_MARKER, 100),
        ]
    }

    #[test]
    fn test_decode_fields() {
        let mut buf = header_bytes(&valid_words());
        let header = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap();

        assert_eq!(header.origin, [-2, 3, 5]);
        assert_eq!(header.extent, [10, 12, 14]);
        assert_eq!(header.rate, [20, 24, 28]);
        // cell = raw / denom, angles = raw / denom
        assert!((header.cell[0] - 50.0).abs() < 1e-4);
        assert!((header.cell[1] - 60.0).abs() < 1e-4);
        assert!((header.cell[2] - 70.0).abs() < 1e-4);
        assert!((header.angles[0] - 90.0).abs() < 1e-4);
        assert!((header.divisor - 2.5).abs() < 1e-6);
        assert_eq!(header.summand, 30);
        assert!(!header.swapped);
    }

    #[test]
    fn test_voxel_size_scales_cell_but_not_angles() {
        let mut buf = header_bytes(&valid_words());
        let header = Dsn6Header::from_bytes(&mut buf, 0.1).unwrap();
        assert!((header.cell[0] - 5.0).abs() < 1e-4);
        assert!((header.angles[0] - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_swap_words_is_idempotent() {
        let original: Vec<u8> = (0u8..=255).collect();
        let mut buf = original.clone();
        swap_words(&mut buf);
        assert_ne!(buf, original);
        swap_words(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_swap_words_leaves_trailing_odd_byte() {
        let mut buf = vec![1u8, 2, 3];
        swap_words(&mut buf);
        assert_eq!(buf, vec![2, 1, 3]);
    }

    #[test]
    fn test_byte_swapped_header_decodes() {
        let mut native = header_bytes(&valid_words());
        let expected = Dsn6Header::from_bytes(&mut native.clone(), 1.0).unwrap();

        // Same words written big-endian must decode to the same header,
        // with the swapped flag raised.
        let mut foreign = vec![0u8; Dsn6Header::SIZE];
        for &(index, value) in &valid_words() {
            BigEndian::write_i16(&mut foreign[2 * index..2 * index + 2], value);
        }
        let header = Dsn6Header::from_bytes(&mut foreign, 1.0).unwrap();
        assert!(header.swapped);
        assert_eq!(header.origin, expected.origin);
        assert_eq!(header.extent, expected.extent);
        assert_eq!(header.cell, expected.cell);

        // After the destructive swap the buffer reads as native order.
        assert_eq!(foreign, native);
    }

    #[test]
    fn test_marker_invalid_in_both_orders() {
        let mut fields = valid_words();
        fields.retain(|&(i, _)| i != words::ENDIAN_MARKER);
        fields.push((words::ENDIAN_MARKER, 999));
        let mut buf = header_bytes(&fields);
        let err = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap_err();
        assert!(err.to_string().contains("endianness marker"));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let mut buf = vec![0u8; 100];
        let err = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap_err();
        assert!(err.to_string().contains("header too short"));
    }

    #[test]
    fn test_rejects_non_positive_extent() {
        for bad in [0, -5] {
            let mut fields = valid_words();
            fields.retain(|&(i, _)| i != words::Y_EXTENT);
            fields.push((words::Y_EXTENT, bad));
            let mut buf = header_bytes(&fields);
            let err = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap_err();
            assert!(err.to_string().contains("extent must be positive"));
        }
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let mut fields = valid_words();
        fields.retain(|&(i, _)| i != words::Z_RATE);
        fields.push((words::Z_RATE, 0));
        let mut buf = header_bytes(&fields);
        let err = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap_err();
        assert!(err.to_string().contains("rate must be positive"));
    }

    #[test]
    fn test_rejects_zero_scale_denominator() {
        let mut fields = valid_words();
        fields.retain(|&(i, _)| i != words::SCALE_DENOM);
        fields.push((words::SCALE_DENOM, 0));
        let mut buf = header_bytes(&fields);
        let err = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap_err();
        assert!(err.to_string().contains("scale denominator"));
    }

    #[test]
    fn test_rejects_zero_divisor() {
        let mut fields = valid_words();
        fields.retain(|&(i, _)| i != words::DIVISOR);
        fields.push((words::DIVISOR, 0));
        let mut buf = header_bytes(&fields);
        let err = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap_err();
        assert!(err.to_string().contains("divisor is zero"));
    }

    #[test]
    fn test_block_counts_and_payload_len() {
        let mut buf = header_bytes(&valid_words());
        let header = Dsn6Header::from_bytes(&mut buf, 1.0).unwrap();
        // extents (10, 12, 14) -> (2, 2, 2) blocks of 512 bytes
        assert_eq!(header.block_counts(), [2, 2, 2]);
        assert_eq!(header.payload_len(), 8 * 512);
        assert_eq!(header.num_voxels(), 10 * 12 * 14);
    }
}
