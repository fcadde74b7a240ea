/// Time-marching parameters shared by every model.
///
/// `c` only drives the linear convection kernels, `nu` only the viscous
/// ones; the unused coefficient is carried at zero so one parameter set can
/// follow a model switch.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    pub c: f64,
    pub nu: f64,
    pub dt: f64,
}

impl Default for SolverParams {
    /// 1-D linear convection on the default 41-point, length-2 domain
    /// (dx = 0.05): Courant number 0.5.
    fn default() -> Self {
        Self { c: 1.0, nu: 0.0, dt: 0.025 }
    }
}

impl SolverParams {
    /// 1-D nonlinear convection. The hat profile peaks at 2, so the local
    /// Courant number reaches 1.0 on the default grid -- the classic
    /// front-steepening setup.
    pub fn default_nonlinear() -> Self {
        Self { c: 0.0, nu: 0.0, dt: 0.025 }
    }

    /// 1-D diffusion, dt chosen for diffusion number 0.2 on the default
    /// grid: dt = 0.2 * dx^2 / nu.
    pub fn default_diffusion() -> Self {
        let dx = 2.0 / 40.0;
        let nu = 0.3;
        Self { c: 0.0, nu, dt: 0.2 * dx * dx / nu }
    }

    /// 1-D Burgers, dt = dx * nu on the default grid.
    pub fn default_burgers() -> Self {
        let dx = 2.0 / 40.0;
        let nu = 0.07;
        Self { c: 0.0, nu, dt: dx * nu }
    }

    /// 2-D linear convection, dt = 0.2 * dx.
    pub fn default_linear_2d() -> Self {
        let dx = 2.0 / 40.0;
        Self { c: 1.0, nu: 0.0, dt: 0.2 * dx }
    }

    /// 2-D nonlinear convection; same sizing rule as the linear case, the
    /// peak value of 2 halves the effective margin.
    pub fn default_nonlinear_2d() -> Self {
        let dx = 2.0 / 40.0;
        Self { c: 0.0, nu: 0.0, dt: 0.2 * dx }
    }

    /// 2-D diffusion, dt = 0.25 * dx * dy / nu.
    pub fn default_diffusion_2d() -> Self {
        let dx = 2.0 / 40.0;
        let nu = 0.05;
        Self { c: 0.0, nu, dt: 0.25 * dx * dx / nu }
    }

    /// 2-D Burgers; the small sigma keeps the coupled system stable well
    /// past front formation.
    pub fn default_burgers_2d() -> Self {
        let dx = 2.0 / 40.0;
        let nu = 0.01;
        Self { c: 0.0, nu, dt: 0.0009 * dx * dx / nu }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_linear_convection() {
        let p = SolverParams::default();
        assert_eq!(p.c, 1.0);
        assert_eq!(p.nu, 0.0);
        assert_eq!(p.dt, 0.025);
    }

    #[test]
    fn test_default_diffusion_number() {
        let p = SolverParams::default_diffusion();
        let dx = 2.0 / 40.0;
        let d = p.nu * p.dt / (dx * dx);
        assert!((d - 0.2).abs() < 1e-12, "diffusion number should be 0.2, got {}", d);
    }

    #[test]
    fn test_default_burgers_dt_rule() {
        let p = SolverParams::default_burgers();
        let dx = 2.0 / 40.0;
        assert!((p.dt - dx * p.nu).abs() < 1e-15);
        assert_eq!(p.nu, 0.07);
    }

    #[test]
    fn test_2d_defaults_within_stability_margin() {
        let dx = 2.0_f64 / 40.0;
        let lin = SolverParams::default_linear_2d();
        // 2-D upwind bound: c*dt*(1/dx + 1/dy) <= 1
        assert!(lin.c * lin.dt * (2.0 / dx) <= 1.0 + 1e-12);
        let diff = SolverParams::default_diffusion_2d();
        assert!(diff.nu * diff.dt * (2.0 / (dx * dx)) <= 0.5 + 1e-12);
    }
}
