/// Fast index for row-major grid cells where x,y are guaranteed in-bounds.
/// Use only when 0 <= x < nx and 0 <= y < ny.
#[inline(always)]
pub const fn idx_inner(x: usize, y: usize, nx: usize) -> usize {
    y * nx + x
}

/// Xorshift128 RNG. Deterministic, seedable, good enough for Monte Carlo
/// sampling; not cryptographic.
pub struct Xor128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl Xor128 {
    pub fn new(seed: u32) -> Self {
        Self {
            x: seed,
            y: seed.wrapping_mul(1812433253).wrapping_add(1),
            z: seed.wrapping_mul(1812433253).wrapping_mul(2).wrapping_add(2),
            w: seed.wrapping_mul(1812433253).wrapping_mul(3).wrapping_add(3),
        }
    }

    pub fn next(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ (t ^ (t >> 8));
        self.w
    }

    /// Returns a float in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        self.next() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Returns a float in [lo, hi)
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Simulation state: the working field(s) and their step-snapshot scratch
/// buffers, allocated once and reused for the whole run.
///
/// `un`/`vn` are overwritten at the top of every step; their content
/// between calls is meaningless. 1-D models use `ny == 1` and leave the
/// `v` pair unset; only the coupled 2-D systems carry `v`/`vn`.
pub struct SimState {
    pub nx: usize,
    pub ny: usize,
    pub dx: f64,
    pub dy: f64,
    pub u: Vec<f64>,
    pub un: Vec<f64>,
    pub v: Option<Vec<f64>>,
    pub vn: Option<Vec<f64>>,
}

/// Hat profile on `nx` points with spacing `dx`: background 1.0, raised to
/// 2.0 where 0.5 <= x <= 1.0. Index bounds follow the truncating
/// `0.5/dx .. 1/dx + 1` arithmetic of the reference setups.
fn hat_1d(nx: usize, dx: f64) -> Vec<f64> {
    let mut u = vec![1.0; nx];
    let lo = (0.5 / dx) as usize;
    let hi = ((1.0 / dx + 1.0) as usize).min(nx);
    for val in u.iter_mut().take(hi).skip(lo) {
        *val = 2.0;
    }
    u
}

/// 2-D hat: the raised slab spans 0.5..1.0 in both directions.
fn hat_2d(nx: usize, ny: usize, dx: f64, dy: f64) -> Vec<f64> {
    let mut u = vec![1.0; nx * ny];
    let x_lo = (0.5 / dx) as usize;
    let x_hi = ((1.0 / dx + 1.0) as usize).min(nx);
    let y_lo = (0.5 / dy) as usize;
    let y_hi = ((1.0 / dy + 1.0) as usize).min(ny);
    for y in y_lo..y_hi {
        for x in x_lo..x_hi {
            u[idx_inner(x, y, nx)] = 2.0;
        }
    }
    u
}

impl SimState {
    /// 1-D field with the hat initial condition.
    pub fn new_1d(nx: usize, dx: f64) -> Self {
        Self {
            nx,
            ny: 1,
            dx,
            dy: 0.0,
            u: hat_1d(nx, dx),
            un: vec![0.0; nx],
            v: None,
            vn: None,
        }
    }

    /// 2-D scalar field with the hat slab.
    pub fn new_2d(nx: usize, ny: usize, dx: f64, dy: f64) -> Self {
        Self {
            nx,
            ny,
            dx,
            dy,
            u: hat_2d(nx, ny, dx, dy),
            un: vec![0.0; nx * ny],
            v: None,
            vn: None,
        }
    }

    /// Coupled 2-D pair; both components start from the same hat slab.
    pub fn new_2d_coupled(nx: usize, ny: usize, dx: f64, dy: f64) -> Self {
        let u = hat_2d(nx, ny, dx, dy);
        let v = u.clone();
        Self {
            nx,
            ny,
            dx,
            dy,
            u,
            un: vec![0.0; nx * ny],
            v: Some(v),
            vn: Some(vec![0.0; nx * ny]),
        }
    }

    pub fn size(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_coupled(&self) -> bool {
        self.v.is_some()
    }

    /// Allocating snapshot convenience method (used in tests).
    #[cfg(any(test, debug_assertions))]
    pub fn snapshot(&self, step: u64, time: f64) -> FrameSnapshot {
        FrameSnapshot {
            nx: self.nx,
            ny: self.ny,
            step,
            time,
            u: self.u.clone(),
            v: self.v.clone(),
        }
    }

    /// Copy current state into a pre-allocated snapshot, avoiding
    /// allocation in the driver's frame loop.
    pub fn snapshot_into(&self, dst: &mut FrameSnapshot, step: u64, time: f64) {
        dst.nx = self.nx;
        dst.ny = self.ny;
        dst.step = step;
        dst.time = time;
        dst.u.resize(self.u.len(), 0.0);
        dst.u.copy_from_slice(&self.u);
        match (&self.v, &mut dst.v) {
            (Some(src), Some(dv)) => {
                dv.resize(src.len(), 0.0);
                dv.copy_from_slice(src);
            }
            (Some(src), dv) => *dv = Some(src.clone()),
            (None, dv) => *dv = None,
        }
    }
}

/// A published frame: field contents plus step/time stamps, handed from
/// the simulation thread to the driver and recycled back.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub nx: usize,
    pub ny: usize,
    pub step: u64,
    pub time: f64,
    pub u: Vec<f64>,
    pub v: Option<Vec<f64>>,
}

impl FrameSnapshot {
    /// Pre-allocate a snapshot buffer matching the given grid.
    pub fn new_empty(nx: usize, ny: usize, coupled: bool) -> Self {
        FrameSnapshot {
            nx,
            ny,
            step: 0,
            time: 0.0,
            u: vec![0.0; nx * ny],
            v: if coupled { Some(vec![0.0; nx * ny]) } else { None },
        }
    }
}
