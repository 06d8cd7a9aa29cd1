//! Grid-to-Cartesian affine construction.
//!
//! DSN6 places its grid inside a crystallographic unit cell, so the
//! transform is built from the standard fractional-to-Cartesian basis
//! (cell lengths and angles), scaled per grid step, then composed with the
//! viewer-facing reorientation: a quarter turn about Y, a translation by
//! the grid start offsets, and an x-axis flip.

use crate::dsn6::header::Dsn6Header;
use crate::error::{Error, Result};

type Mat4 = [[f32; 4]; 4];

/// Cartesian step vectors for the x/y/z grid axes, one grid index apart.
///
/// These are the unit-cell basis vectors divided component-wise by the map
/// rates; they become the columns of the 3x3 part of the full transform
/// before reorientation.
pub fn grid_basis(header: &Dsn6Header) -> Result<[[f32; 3]; 3]> {
    let columns = cell_basis(header)?;
    let mut steps = [[0.0f32; 3]; 3];
    for (step, (column, &rate)) in steps.iter_mut().zip(columns.iter().zip(&header.rate)) {
        let rate = f64::from(rate);
        for (s, &c) in step.iter_mut().zip(column) {
            *s = (c / rate) as f32;
        }
    }
    Ok(steps)
}

/// Build the 4x4 affine placing grid-index space into Cartesian space.
///
/// Row-major homogeneous matrix for column vectors: the upper 3x3 columns
/// are the [`grid_basis`] step vectors, right-multiplied by a 90° rotation
/// about Y, a translation by `(-z_start, y_start, x_start)`, and a scale of
/// `(-1, 1, 1)`.
pub fn compute_transform(header: &Dsn6Header) -> Result<Mat4> {
    let [sx, sy, sz] = grid_basis(header)?;
    let basis = [
        [sx[0], sy[0], sz[0], 0.0],
        [sx[1], sy[1], sz[1], 0.0],
        [sx[2], sy[2], sz[2], 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    let [x_start, y_start, z_start] = header.origin.map(|n| n as f32);
    let mut out = mat_mul(&basis, &ROTATE_Y_QUARTER);
    out = mat_mul(&out, &translation(-z_start, y_start, x_start));
    out = mat_mul(&out, &scale(-1.0, 1.0, 1.0));
    Ok(out)
}

/// Unit-cell basis columns in the header's linear unit.
///
/// Standard crystallographic construction: a along x, b in the xy plane,
/// c completing the cell. Cells whose angles give the c axis a non-real
/// out-of-plane component are rejected.
fn cell_basis(header: &Dsn6Header) -> Result<[[f64; 3]; 3]> {
    let [a, b, c] = header.cell.map(f64::from);
    let [alpha, beta, gamma] = header.angles.map(|deg| f64::from(deg).to_radians());

    let (sin_gamma, cos_gamma) = gamma.sin_cos();
    let cos_alpha = alpha.cos();
    let (sin_beta, cos_beta) = beta.sin_cos();

    let col_a = [a, 0.0, 0.0];
    let col_b = [b * cos_gamma, b * sin_gamma, 0.0];

    let cx = c * cos_beta;
    let cy = c * (cos_alpha - cos_gamma * cos_beta) / sin_gamma;
    let radicand = (c * sin_beta).powi(2) - cy * cy;
    if radicand.is_nan() || radicand < 0.0 {
        return Err(Error::DegenerateCell(format!(
            "cell {:?} with angles {:?} has no real c-axis component \
             (radicand {radicand})",
            header.cell, header.angles
        )));
    }
    let col_c = [cx, cy, radicand.sqrt()];

    Ok([col_a, col_b, col_c])
}

/// Quarter turn about the Y axis, written with exact constants so
/// orthogonal cells stay exact in f32.
const ROTATE_Y_QUARTER: Mat4 = [
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
    [
        [1.0, 0.0, 0.0, tx],
        [0.0, 1.0, 0.0, ty],
        [0.0, 0.0, 1.0, tz],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    [
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn mat_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for (row_out, row_a) in out.iter_mut().zip(a) {
        for (j, cell) in row_out.iter_mut().enumerate() {
            *cell = (0..4).map(|k| row_a[k] * b[k][j]).sum();
        }
    }
    out
}
