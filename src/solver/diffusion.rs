use crate::state::idx_inner;
use super::error::{self, SolverError};

/// Explicit central-difference diffusion du/dt = nu d²u/dx².
///
/// Update for `i` in `1..nx-1` (both endpoints are fixed boundaries):
/// `u[i] = un[i] + nu*dt/dx² * (un[i-1] + un[i+1] - 2*un[i])`.
/// Stable for `nu*dt/dx² <= 1/2`; no internal check or clamp.
pub fn advance_1d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    dt: f64,
    dx: f64,
    nu: f64,
) -> i64 {
    let coeff = nu * dt / (dx * dx);
    for _ in 0..nt {
        un[..nx].copy_from_slice(&u[..nx]);
        for i in 1..nx.saturating_sub(1) {
            u[i] = un[i] + coeff * (un[i - 1] + un[i + 1] - 2.0 * un[i]);
        }
    }
    0
}

/// Length-checked wrapper around [`advance_1d`].
pub fn step_1d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    dt: f64,
    dx: f64,
    nu: f64,
) -> Result<i64, SolverError> {
    error::check_grid_1d(nx)?;
    error::check_len("u", u, nx)?;
    error::check_len("un", un, nx)?;
    Ok(advance_1d(u, un, nt, nx, dt, dx, nu))
}

/// 2-D diffusion on a row-major grid; every edge row/column is fixed.
pub fn advance_2d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    ny: usize,
    dt: f64,
    dx: f64,
    dy: f64,
    nu: f64,
) -> i64 {
    let size = nx * ny;
    let cx = nu * dt / (dx * dx);
    let cy = nu * dt / (dy * dy);
    for _ in 0..nt {
        un[..size].copy_from_slice(&u[..size]);
        for y in 1..ny.saturating_sub(1) {
            for x in 1..nx.saturating_sub(1) {
                let ii = idx_inner(x, y, nx);
                u[ii] = un[ii]
                    - cx * (2.0 * un[ii] - un[idx_inner(x - 1, y, nx)] - un[idx_inner(x + 1, y, nx)])
                    - cy * (2.0 * un[ii] - un[idx_inner(x, y - 1, nx)] - un[idx_inner(x, y + 1, nx)]);
            }
        }
    }
    0
}

/// Shape-checked wrapper around [`advance_2d`].
pub fn step_2d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    ny: usize,
    dt: f64,
    dx: f64,
    dy: f64,
    nu: f64,
) -> Result<i64, SolverError> {
    error::check_grid_2d(nx, ny)?;
    error::check_shape("u", u, nx, ny)?;
    error::check_shape("un", un, nx, ny)?;
    Ok(advance_2d(u, un, nt, nx, ny, dt, dx, dy, nu))
}
