use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::config::GridConfig;
use crate::solver::{self, SolverError, SolverParams};
use crate::state::{FrameSnapshot, SimState};

/// The model equations the driver can march.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    Linear1d,
    Nonlinear1d,
    Diffusion1d,
    Burgers1d,
    Linear2d,
    Nonlinear2d,
    Diffusion2d,
    Burgers2d,
}

impl Default for Model {
    fn default() -> Self {
        Self::Linear1d
    }
}

impl Model {
    pub const ALL: [Model; 8] = [
        Model::Linear1d,
        Model::Nonlinear1d,
        Model::Diffusion1d,
        Model::Burgers1d,
        Model::Linear2d,
        Model::Nonlinear2d,
        Model::Diffusion2d,
        Model::Burgers2d,
    ];

    /// CLI name, also used as the recording manifest's model string.
    pub fn label(self) -> &'static str {
        match self {
            Model::Linear1d => "linear1d",
            Model::Nonlinear1d => "nonlinear1d",
            Model::Diffusion1d => "diffusion1d",
            Model::Burgers1d => "burgers1d",
            Model::Linear2d => "linear2d",
            Model::Nonlinear2d => "nonlinear2d",
            Model::Diffusion2d => "diffusion2d",
            Model::Burgers2d => "burgers2d",
        }
    }

    pub fn parse(name: &str) -> Option<Model> {
        Model::ALL.iter().copied().find(|m| m.label() == name)
    }

    pub fn is_2d(self) -> bool {
        matches!(
            self,
            Model::Linear2d | Model::Nonlinear2d | Model::Diffusion2d | Model::Burgers2d
        )
    }

    /// Coupled systems march a (u, v) pair.
    pub fn is_coupled(self) -> bool {
        matches!(self, Model::Nonlinear2d | Model::Burgers2d)
    }
}

/// Per-model parameter storage.
pub struct ModelParams {
    pub linear1d: SolverParams,
    pub nonlinear1d: SolverParams,
    pub diffusion1d: SolverParams,
    pub burgers1d: SolverParams,
    pub linear2d: SolverParams,
    pub nonlinear2d: SolverParams,
    pub diffusion2d: SolverParams,
    pub burgers2d: SolverParams,
}

impl ModelParams {
    pub fn new() -> Self {
        Self {
            linear1d: SolverParams::default(),
            nonlinear1d: SolverParams::default_nonlinear(),
            diffusion1d: SolverParams::default_diffusion(),
            burgers1d: SolverParams::default_burgers(),
            linear2d: SolverParams::default_linear_2d(),
            nonlinear2d: SolverParams::default_nonlinear_2d(),
            diffusion2d: SolverParams::default_diffusion_2d(),
            burgers2d: SolverParams::default_burgers_2d(),
        }
    }

    pub fn get(&self, model: Model) -> &SolverParams {
        match model {
            Model::Linear1d => &self.linear1d,
            Model::Nonlinear1d => &self.nonlinear1d,
            Model::Diffusion1d => &self.diffusion1d,
            Model::Burgers1d => &self.burgers1d,
            Model::Linear2d => &self.linear2d,
            Model::Nonlinear2d => &self.nonlinear2d,
            Model::Diffusion2d => &self.diffusion2d,
            Model::Burgers2d => &self.burgers2d,
        }
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the simulation state for a model from the configured grid.
pub fn create_sim_state(model: Model, grid: &GridConfig) -> SimState {
    let dx = grid.x_len / (grid.nx.max(2) - 1) as f64;
    let dy = grid.y_len / (grid.ny.max(2) - 1) as f64;
    if model.is_coupled() {
        SimState::new_2d_coupled(grid.nx, grid.ny, dx, dy)
    } else if model.is_2d() {
        SimState::new_2d(grid.nx, grid.ny, dx, dy)
    } else {
        SimState::new_1d(grid.nx, dx)
    }
}

/// Advance `state` by `nt` steps of `model`, through the checked solver
/// entry points.
pub fn advance(
    model: Model,
    state: &mut SimState,
    params: &SolverParams,
    nt: usize,
) -> Result<i64, SolverError> {
    let (nx, ny) = (state.nx, state.ny);
    let (dx, dy) = (state.dx, state.dy);
    match model {
        Model::Linear1d => {
            solver::linear::step_1d(&mut state.u, &mut state.un, nt, nx, params.dt, dx, params.c)
        }
        Model::Nonlinear1d => {
            solver::nonlinear::step_1d(&mut state.u, &mut state.un, nt, nx, params.dt, dx)
        }
        Model::Diffusion1d => {
            solver::diffusion::step_1d(&mut state.u, &mut state.un, nt, nx, params.dt, dx, params.nu)
        }
        Model::Burgers1d => {
            solver::burgers::step_1d(&mut state.u, &mut state.un, nt, nx, params.dt, dx, params.nu)
        }
        Model::Linear2d => solver::linear::step_2d(
            &mut state.u, &mut state.un, nt, nx, ny, params.dt, dx, dy, params.c,
        ),
        Model::Diffusion2d => solver::diffusion::step_2d(
            &mut state.u, &mut state.un, nt, nx, ny, params.dt, dx, dy, params.nu,
        ),
        Model::Nonlinear2d | Model::Burgers2d => {
            let size = nx * ny;
            let (v, vn) = match (state.v.as_mut(), state.vn.as_mut()) {
                (Some(v), Some(vn)) => (v, vn),
                _ => {
                    return Err(SolverError::LengthMismatch {
                        field: "v",
                        expected: size,
                        actual: 0,
                    });
                }
            };
            if model == Model::Nonlinear2d {
                solver::nonlinear::step_2d(
                    &mut state.u, &mut state.un, v, vn, nt, nx, ny, params.dt, dx, dy,
                )
            } else {
                solver::burgers::step_2d(
                    &mut state.u, &mut state.un, v, vn, nt, nx, ny, params.dt, dx, dy, params.nu,
                )
            }
        }
    }
}

/// Channels connecting the driver to the simulation thread.
pub struct SimChannels {
    pub snap_rx: mpsc::Receiver<FrameSnapshot>,
    pub snap_return_tx: mpsc::Sender<FrameSnapshot>,
}

/// Spawn the simulation thread: `nt_total` steps in bursts of
/// `steps_per_frame`, each burst followed by a published snapshot. The
/// thread stops early when `running` clears or the receiver goes away.
pub fn spawn_sim_thread(
    model: Model,
    params: SolverParams,
    mut sim: SimState,
    nt_total: usize,
    steps_per_frame: usize,
    running: Arc<AtomicBool>,
) -> (SimChannels, std::thread::JoinHandle<()>) {
    let (snap_tx, snap_rx) = mpsc::sync_channel::<FrameSnapshot>(1);
    let (snap_return_tx, snap_return_rx) = mpsc::channel::<FrameSnapshot>();
    let steps_per_frame = steps_per_frame.max(1);

    let handle = std::thread::spawn(move || {
        let mut snap_buf = FrameSnapshot::new_empty(sim.nx, sim.ny, sim.is_coupled());
        let mut step_count: u64 = 0;

        while running.load(Ordering::SeqCst) && (step_count as usize) < nt_total {
            let burst = steps_per_frame.min(nt_total - step_count as usize);
            if let Err(e) = advance(model, &mut sim, &params, burst) {
                eprintln!("solver error: {e}");
                break;
            }
            step_count += burst as u64;
            sim.snapshot_into(&mut snap_buf, step_count, step_count as f64 * params.dt);
            if snap_tx.send(snap_buf).is_err() {
                break;
            }
            snap_buf = snap_return_rx
                .try_recv()
                .ok()
                .unwrap_or_else(|| FrameSnapshot::new_empty(sim.nx, sim.ny, sim.is_coupled()));
        }
    });

    let channels = SimChannels { snap_rx, snap_return_tx };
    (channels, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    #[test]
    fn test_parse_round_trips_every_label() {
        for m in Model::ALL {
            assert_eq!(Model::parse(m.label()), Some(m));
        }
        assert_eq!(Model::parse("navier"), None);
    }

    #[test]
    fn test_model_predicates() {
        assert!(!Model::Linear1d.is_2d());
        assert!(Model::Linear2d.is_2d());
        assert!(Model::Nonlinear2d.is_coupled());
        assert!(Model::Burgers2d.is_coupled());
        assert!(!Model::Linear2d.is_coupled());
    }

    #[test]
    fn test_create_sim_state_shapes() {
        let grid = GridConfig::default();
        let s1 = create_sim_state(Model::Linear1d, &grid);
        assert_eq!((s1.nx, s1.ny), (41, 1));
        assert!((s1.dx - 0.05).abs() < 1e-12);
        let s2 = create_sim_state(Model::Diffusion2d, &grid);
        assert_eq!((s2.nx, s2.ny), (41, 41));
        assert!(!s2.is_coupled());
        let s3 = create_sim_state(Model::Burgers2d, &grid);
        assert!(s3.is_coupled());
    }

    #[test]
    fn test_advance_every_model_no_panic() {
        let grid = GridConfig::default();
        let params = ModelParams::new();
        for m in Model::ALL {
            let mut state = create_sim_state(m, &grid);
            let status = advance(m, &mut state, params.get(m), 3)
                .unwrap_or_else(|e| panic!("{} failed: {}", m.label(), e));
            assert_eq!(status, 0);
            assert!(
                state.u.iter().all(|v| v.is_finite()),
                "{} produced non-finite values",
                m.label()
            );
        }
    }

    #[test]
    fn test_advance_matches_direct_kernel_call() {
        let grid = GridConfig::default();
        let params = SolverParams::default();
        let mut via_scenario = create_sim_state(Model::Linear1d, &grid);
        let mut direct = create_sim_state(Model::Linear1d, &grid);
        advance(Model::Linear1d, &mut via_scenario, &params, 20).unwrap();
        solver::linear::advance_1d(
            &mut direct.u, &mut direct.un, 20, direct.nx, params.dt, direct.dx, params.c,
        );
        assert_eq!(via_scenario.u, direct.u);
    }

    #[test]
    fn test_sim_thread_runs_to_completion() {
        let grid = GridConfig::default();
        let running = Arc::new(AtomicBool::new(true));
        let sim = create_sim_state(Model::Linear1d, &grid);
        let (channels, handle) = spawn_sim_thread(
            Model::Linear1d,
            SolverParams::default(),
            sim,
            20,
            5,
            running,
        );
        let mut frames = 0;
        let mut last_step = 0;
        for snap in channels.snap_rx.iter() {
            frames += 1;
            last_step = snap.step;
            let _ = channels.snap_return_tx.send(snap);
        }
        handle.join().unwrap();
        assert_eq!(frames, 4, "20 steps in bursts of 5");
        assert_eq!(last_step, 20);
    }

    #[test]
    fn test_sim_thread_stops_on_flag() {
        let grid = GridConfig::default();
        let running = Arc::new(AtomicBool::new(false));
        let sim = create_sim_state(Model::Linear1d, &grid);
        let (channels, handle) = spawn_sim_thread(
            Model::Linear1d,
            SolverParams::default(),
            sim,
            1_000_000,
            1,
            running,
        );
        // Flag was already clear: the thread publishes nothing.
        assert!(channels.snap_rx.iter().next().is_none());
        handle.join().unwrap();
    }
}
