use crate::state::idx_inner;
use super::error::{self, SolverError};

/// Advance `u` through `nt` explicit upwind steps of the linear convection
/// equation du/dt + c du/dx = 0 on an `nx`-point grid.
///
/// Each step snapshots `u[0..nx]` into `un`, then sweeps left to right:
/// `u[i] = un[i] - c*dt/dx * (un[i] - un[i-1])` for `i` in `1..nx`. Index 0
/// is never written; it keeps whatever the caller put there (a fixed
/// Dirichlet boundary). `un` is scratch: its content on entry is ignored,
/// and on exit it holds the previous step.
///
/// Preconditions: `u.len() >= nx` and `un.len() >= nx`. They are not
/// re-checked here; use [`step_1d`] for the validated entry point. A
/// violation panics on slice access.
///
/// Arithmetic is plain f64 with no clamping; with `c*dt/dx > 1` the scheme
/// diverges, and that is the caller's concern. Returns a status code,
/// currently `0` on every path (reserved).
pub fn advance_1d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    dt: f64,
    dx: f64,
    c: f64,
) -> i64 {
    let coeff = c * dt / dx;
    for _ in 0..nt {
        un[..nx].copy_from_slice(&u[..nx]);
        for i in 1..nx {
            u[i] = un[i] - coeff * (un[i] - un[i - 1]);
        }
    }
    0
}

/// Length-checked wrapper around [`advance_1d`]. On error the buffers are
/// untouched.
pub fn step_1d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    dt: f64,
    dx: f64,
    c: f64,
) -> Result<i64, SolverError> {
    error::check_grid_1d(nx)?;
    error::check_len("u", u, nx)?;
    error::check_len("un", un, nx)?;
    Ok(advance_1d(u, un, nt, nx, dt, dx, c))
}

/// 2-D upwind convection on a row-major `nx * ny` grid.
///
/// Update for `x` in `1..nx`, `y` in `1..ny`:
/// `u[x,y] -= c*dt*((u-u[x-1,y])/dx + (u-u[x,y-1])/dy)` evaluated on the
/// snapshot. Row `y = 0` and column `x = 0` are fixed boundaries.
pub fn advance_2d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    ny: usize,
    dt: f64,
    dx: f64,
    dy: f64,
    c: f64,
) -> i64 {
    let size = nx * ny;
    for _ in 0..nt {
        un[..size].copy_from_slice(&u[..size]);
        for y in 1..ny {
            for x in 1..nx {
                let ii = idx_inner(x, y, nx);
                u[ii] = un[ii]
                    - c * dt
                        * ((un[ii] - un[idx_inner(x - 1, y, nx)]) / dx
                            + (un[ii] - un[idx_inner(x, y - 1, nx)]) / dy);
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
    c: f64,
) -> Result<i64, SolverError> {
    error::check_grid_2d(nx, ny)?;
    error::check_shape("u", u, nx, ny)?;
    error::check_shape("un", un, nx, ny)?;
    Ok(advance_2d(u, un, nt, nx, ny, dt, dx, dy, c))
}
