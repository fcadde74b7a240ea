use crate::state::idx_inner;
use super::error::{self, SolverError};

/// Nonlinear (inviscid) convection du/dt + u du/dx = 0, explicit upwind.
///
/// Same marching shape as the linear kernel, with the local field value as
/// the convection speed: `u[i] = un[i] - un[i]*dt/dx * (un[i] - un[i-1])`
/// for `i` in `1..nx`. Index 0 is a fixed boundary. Preconditions as for
/// the linear kernel; not re-checked here.
pub fn advance_1d(
    u: &mut [f64],
    un: &mut [f64],
    nt: usize,
    nx: usize,
    dt: f64,
    dx: f64,
) -> i64 {
    for _ in 0..nt {
        un[..nx].copy_from_slice(&u[..nx]);
        for i in 1..nx {
            u[i] = un[i] - un[i] * dt / dx * (un[i] - un[i - 1]);
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
) -> Result<i64, SolverError> {
    error::check_grid_1d(nx)?;
    error::check_len("u", u, nx)?;
    error::check_len("un", un, nx)?;
    Ok(advance_1d(u, un, nt, nx, dt, dx))
}

/// Coupled 2-D nonlinear convection: the (u, v) pair advects itself.
///
/// Both fields snapshot before either updates, so the step reads a
/// consistent previous state. Update for `x` in `1..nx`, `y` in `1..ny`:
/// ```text
/// u = un - un*dt/dx*(un - un[x-1,y]) - vn*dt/dy*(un - un[x,y-1])
/// v = vn - un*dt/dx*(vn - vn[x-1,y]) - vn*dt/dy*(vn - vn[x,y-1])
/// ```
/// Row 0 and column 0 stay fixed on both fields.
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
) -> i64 {
    let size = nx * ny;
    for _ in 0..nt {
        un[..size].copy_from_slice(&u[..size]);
        vn[..size].copy_from_slice(&v[..size]);
        for y in 1..ny {
            for x in 1..nx {
                let ii = idx_inner(x, y, nx);
                let il = idx_inner(x - 1, y, nx);
                let id = idx_inner(x, y - 1, nx);
                u[ii] = un[ii]
                    - un[ii] * dt / dx * (un[ii] - un[il])
                    - vn[ii] * dt / dy * (un[ii] - un[id]);
                v[ii] = vn[ii]
                    - un[ii] * dt / dx * (vn[ii] - vn[il])
                    - vn[ii] * dt / dy * (vn[ii] - vn[id]);
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
) -> Result<i64, SolverError> {
    error::check_grid_2d(nx, ny)?;
    error::check_shape("u", u, nx, ny)?;
    error::check_shape("un", un, nx, ny)?;
    error::check_shape("v", v, nx, ny)?;
    error::check_shape("vn", vn, nx, ny)?;
    Ok(advance_2d(u, un, v, vn, nt, nx, ny, dt, dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::idx_inner;

    #[test]
    fn test_uniform_field_is_steady() {
        // u du/dx vanishes on a constant field, whatever the speed.
        let mut u = vec![2.0; 41];
        let mut un = vec![0.0; 41];
        advance_1d(&mut u, &mut un, 50, 41, 0.025, 0.05);
        assert!(u.iter().all(|&v| (v - 2.0).abs() < 1e-15), "uniform field must not move");
    }

    #[test]
    fn test_one_step_matches_formula() {
        let nx = 41;
        let dx = 2.0 / 40.0;
        let dt = 0.025;
        let mut u = vec![1.0; nx];
        u[10] = 2.0;
        let before = u.clone();
        let mut un = vec![0.0; nx];
        advance_1d(&mut u, &mut un, 1, nx, dt, dx);
        for i in 1..nx {
            let expect = before[i] - before[i] * dt / dx * (before[i] - before[i - 1]);
            assert!((u[i] - expect).abs() < 1e-14, "mismatch at {}: {} vs {}", i, u[i], expect);
        }
        assert_eq!(u[0], before[0]);
    }

    #[test]
    fn test_zero_steps_identity_and_boundary_fixed() {
        let nx = 21;
        let mut u: Vec<f64> = (0..nx).map(|i| 1.0 + (i % 3) as f64 * 0.25).collect();
        let before = u.clone();
        let mut un = vec![0.0; nx];
        advance_1d(&mut u, &mut un, 0, nx, 0.025, 0.1);
        assert_eq!(u, before);
        advance_1d(&mut u, &mut un, 40, nx, 0.002, 0.1);
        assert_eq!(u[0], before[0], "boundary point must keep its value");
    }

    #[test]
    fn test_2d_uniform_pair_is_steady() {
        let (nx, ny) = (11, 13);
        let mut u = vec![1.5; nx * ny];
        let mut v = vec![0.5; nx * ny];
        let mut un = vec![0.0; nx * ny];
        let mut vn = vec![0.0; nx * ny];
        advance_2d(&mut u, &mut un, &mut v, &mut vn, 25, nx, ny, 0.01, 0.1, 0.1);
        assert!(u.iter().all(|&x| (x - 1.5).abs() < 1e-15));
        assert!(v.iter().all(|&x| (x - 0.5).abs() < 1e-15));
    }

    #[test]
    fn test_2d_snapshot_consistency() {
        // The v update must read the pre-step u (un), not the half-updated
        // one. One step on a crafted field distinguishes the two.
        let (nx, ny) = (4, 4);
        let dt = 0.1;
        let (dx, dy) = (1.0, 1.0);
        let mut u: Vec<f64> = (0..nx * ny).map(|i| i as f64 * 0.1).collect();
        let mut v: Vec<f64> = (0..nx * ny).map(|i| 1.0 - i as f64 * 0.05).collect();
        let u0 = u.clone();
        let v0 = v.clone();
        let mut un = vec![0.0; nx * ny];
        let mut vn = vec![0.0; nx * ny];
        advance_2d(&mut u, &mut un, &mut v, &mut vn, 1, nx, ny, dt, dx, dy);
        for y in 1..ny {
            for x in 1..nx {
                let ii = idx_inner(x, y, nx);
                let il = idx_inner(x - 1, y, nx);
                let id = idx_inner(x, y - 1, nx);
                let eu = u0[ii]
                    - u0[ii] * dt / dx * (u0[ii] - u0[il])
                    - v0[ii] * dt / dy * (u0[ii] - u0[id]);
                let ev = v0[ii]
                    - u0[ii] * dt / dx * (v0[ii] - v0[il])
                    - v0[ii] * dt / dy * (v0[ii] - v0[id]);
                assert!((u[ii] - eu).abs() < 1e-14, "u mismatch at ({},{})", x, y);
                assert!((v[ii] - ev).abs() < 1e-14, "v mismatch at ({},{})", x, y);
            }
        }
    }

    #[test]
    fn test_step_2d_rejects_missing_v_samples() {
        let (nx, ny) = (5, 5);
        let mut u = vec![1.0; nx * ny];
        let mut un = vec![0.0; nx * ny];
        let mut v = vec![1.0; 10];
        let mut vn = vec![0.0; nx * ny];
        let err =
            step_2d(&mut u, &mut un, &mut v, &mut vn, 1, nx, ny, 0.01, 0.1, 0.1).unwrap_err();
        assert_eq!(err, SolverError::ShapeMismatch { field: "v", nx, ny, len: 10 });
    }
}
