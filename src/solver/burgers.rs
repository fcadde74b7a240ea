use crate::state::idx_inner;
use super::error::{self, SolverError};

/// Viscous Burgers equation du/dt + u du/dx = nu d²u/dx², explicit upwind
/// convection plus central diffusion.
///
/// Update for `i` in `1..nx-1` (both endpoints fixed):
/// `u[i] = un[i] + nu*dt*(un[i-1] + un[i+1] - 2*un[i])/dx²
///        - un[i]*dt*(un[i] - un[i-1])/dx`.
pub fn advance_1d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    dt: f64,
    dx: f64,
    nu: f64,
) -> i64 {
    for _ in 0..nt {
        un[..nx].copy_from_slice(&u[..nx]);
        for i in 1..nx.saturating_sub(1) {
            u[i] = un[i] + nu * dt * (un[i - 1] + un[i + 1] - 2.0 * un[i]) / (dx * dx)
                - un[i] * dt * (un[i] - un[i - 1]) / dx;
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

/// Coupled 2-D Burgers system on a row-major grid, interior cells only.
/// Upwind self-advection of the (u, v) pair plus central diffusion on both
/// fields; both snapshot before either updates.
pub fn advance_2d(
    u: &mut [f64],
    un: &mut [f64],
    v: &mut [f64],
    vn: &mut [f64],
    nt: usize,
    nx: usize,
    ny: usize,
    dt: f64,
    dx: f64,
    dy: f64,
    nu: f64,
) -> i64 {
    let size = nx * ny;
    for _ in 0..nt {
        un[..size].copy_from_slice(&u[..size]);
        vn[..size].copy_from_slice(&v[..size]);
        for y in 1..ny.saturating_sub(1) {
            for x in 1..nx.saturating_sub(1) {
                let ii = idx_inner(x, y, nx);
                let il = idx_inner(x - 1, y, nx);
                let ir = idx_inner(x + 1, y, nx);
                let id = idx_inner(x, y - 1, nx);
                let iu = idx_inner(x, y + 1, nx);
                let lap_u = (un[ir] - 2.0 * un[ii] + un[il]) / (dx * dx)
                    + (un[iu] - 2.0 * un[ii] + un[id]) / (dy * dy);
                let lap_v = (vn[ir] - 2.0 * vn[ii] + vn[il]) / (dx * dx)
                    + (vn[iu] - 2.0 * vn[ii] + vn[id]) / (dy * dy);
                u[ii] = un[ii]
                    - un[ii] * dt * (un[ii] - un[il]) / dx
                    - vn[ii] * dt * (un[ii] - un[id]) / dy
                    + nu * dt * lap_u;
                v[ii] = vn[ii]
                    - un[ii] * dt * (vn[ii] - vn[il]) / dx
                    - vn[ii] * dt * (vn[ii] - vn[id]) / dy
                    + nu * dt * lap_v;
            }
        }
    }
    0
}

/// Shape-checked wrapper around [`advance_2d`].
pub fn step_2d(
    u: &mut [f64],
    un: &mut [f64],
    v: &mut [f64],
    vn: &mut [f64],
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
    error::check_shape("v", v, nx, ny)?;
    error::check_shape("vn", vn, nx, ny)?;
    Ok(advance_2d(u, un, v, vn, nt, nx, ny, dt, dx, dy, nu))
}
