use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use convarium::config;
use convarium::quadrature;
use convarium::recorder::CvfWriter;
use convarium::render;
use convarium::scenario::{self, Model, ModelParams};
use convarium::solver::diagnostics;

struct Defaults;

impl Defaults {
    const THREADS: usize = 4;
    const WATCH_COLS: usize = 80;
    const WATCH_ROWS: usize = 20;
    const MC_SAMPLES: usize = 1_000_000;
    const MC_SEED: u32 = 42;
    const PANELS: usize = 1000;
}

struct CliArgs {
    model: Model,
    nt: Option<usize>,
    record: Option<String>,
    watch: bool,
    quiet: bool,
    integrals: bool,
    threads: usize,
}

fn print_usage() {
    eprintln!("Usage: convarium [MODEL] [OPTIONS]");
    eprintln!();
    eprintln!("Models:");
    for m in Model::ALL {
        eprintln!("  {}", m.label());
    }
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --nt N         total steps (overrides convarium.yaml)");
    eprintln!("  --record DIR   write .cvf frames + manifest.json to DIR");
    eprintln!("  --watch        render the field to the terminal each frame");
    eprintln!("  --quiet        suppress per-frame diagnostics");
    eprintln!("  --integrals    run the integration demos instead of a model");
    eprintln!("  --threads N    worker threads for --integrals (default 4)");
}

fn parse_args() -> Result<CliArgs, String> {
    let mut out = CliArgs {
        model: Model::default(),
        nt: None,
        record: None,
        watch: false,
        quiet: false,
        integrals: false,
        threads: Defaults::THREADS,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--watch" => out.watch = true,
            "--quiet" => out.quiet = true,
            "--integrals" => out.integrals = true,
            "--nt" => {
                let v = args.next().ok_or("--nt needs a value")?;
                out.nt = Some(v.parse().map_err(|_| format!("bad --nt value: {v}"))?);
            }
            "--threads" => {
                let v = args.next().ok_or("--threads needs a value")?;
                out.threads = v.parse().map_err(|_| format!("bad --threads value: {v}"))?;
            }
            "--record" => {
                out.record = Some(args.next().ok_or("--record needs a directory")?);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            name if !name.starts_with('-') => {
                out.model = Model::parse(name).ok_or(format!("unknown model: {name}"))?;
            }
            other => return Err(format!("unknown option: {other}")),
        }
    }
    Ok(out)
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            std::process::exit(2);
        }
    };

    if args.integrals {
        run_integrals(args.threads);
    } else {
        run_model(&args);
    }
}

/// The integration demos: cos over [0, 3*pi/2] (exact value -1) with the
/// three quadratures, plus the Monte Carlo pi estimate.
fn run_integrals(threads: usize) {
    let xmax = 3.0 * std::f64::consts::PI / 2.0;

    let t = Instant::now();
    let rect = quadrature::parallel::rectangle(f64::cos, 0.0, xmax, Defaults::PANELS, threads);
    println!("rectangle   = {rect:+.9} in {:?}", t.elapsed());

    let t = Instant::now();
    let trap = quadrature::parallel::trapezoid(f64::cos, 0.0, xmax, Defaults::PANELS, threads);
    println!("trapezoid   = {trap:+.9} in {:?}", t.elapsed());

    let t = Instant::now();
    let mc = quadrature::parallel::monte_carlo(
        f64::cos, 0.0, xmax, Defaults::MC_SAMPLES, Defaults::MC_SEED, threads,
    );
    println!("monte carlo = {mc:+.9} in {:?}", t.elapsed());

    let t = Instant::now();
    let pi = quadrature::parallel::monte_carlo_pi(Defaults::MC_SAMPLES, Defaults::MC_SEED, threads);
    println!("pi estimate = {pi:+.9} in {:?}", t.elapsed());
}

/// Warn once when the configured parameters sit outside the stability
/// bound. Advisory only: the kernels never clamp.
fn warn_if_unstable(model: Model, params: &convarium::solver::SolverParams, dx: f64, dy: f64) {
    let (number, limit, name) = match model {
        Model::Linear1d => (diagnostics::courant_1d(params.c, params.dt, dx), 1.0, "Courant"),
        Model::Linear2d => (diagnostics::courant_2d(params.c, params.dt, dx, dy), 1.0, "Courant"),
        Model::Diffusion1d => {
            (diagnostics::diffusion_number_1d(params.nu, params.dt, dx), 0.5, "diffusion number")
        }
        Model::Diffusion2d => {
            (diagnostics::diffusion_number_2d(params.nu, params.dt, dx, dy), 0.5, "diffusion number")
        }
        // Nonlinear speeds depend on the field itself; no single number.
        _ => return,
    };
    if number > limit {
        eprintln!(
            "Warning: {name} {number:.3} exceeds {limit}; expect the run to diverge"
        );
    }
}

fn run_model(args: &CliArgs) {
    let cfg = config::load();
    let model = args.model;

    let model_params = ModelParams::new();
    let mut params = model_params.get(model).clone();
    cfg.physics.apply(&mut params);

    let sim = scenario::create_sim_state(model, &cfg.grid);
    let (nx, ny) = (sim.nx, sim.ny);
    warn_if_unstable(model, &params, sim.dx, sim.dy);

    let nt_total = args.nt.unwrap_or(cfg.run.nt);

    // Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let mut writer = args.record.as_ref().and_then(|dir| {
        let mut fields = vec!["u".to_string()];
        if model.is_coupled() {
            fields.push("v".to_string());
        }
        match CvfWriter::create(
            dir,
            model.label(),
            nx,
            ny,
            params.dt,
            cfg.run.steps_per_frame as u64,
            fields,
        ) {
            Ok(w) => Some(w),
            Err(e) => {
                eprintln!("Warning: cannot record to {dir}: {e}");
                None
            }
        }
    });

    let (channels, handle) = scenario::spawn_sim_thread(
        model,
        params,
        sim,
        nt_total,
        cfg.run.steps_per_frame,
        running.clone(),
    );

    let mut last_step = 0;
    for snap in channels.snap_rx.iter() {
        if !args.quiet {
            let (min, max) = diagnostics::extrema(&snap.u);
            eprintln!(
                "step={} t={:.4} min={:.4} max={:.4} rms={:.6}",
                snap.step,
                snap.time,
                min,
                max,
                diagnostics::rms(&snap.u)
            );
        }
        if args.watch {
            if ny > 1 {
                println!("{}", render::render_field(&snap.u, nx, ny, Defaults::WATCH_COLS, Defaults::WATCH_ROWS));
            } else {
                println!("{}", render::render_profile(&snap.u, Defaults::WATCH_COLS));
            }
        }
        if let Some(w) = writer.as_mut() {
            if let Err(e) = w.write_frame(&snap) {
                eprintln!("Warning: frame write failed: {e}");
            }
        }
        last_step = snap.step;
        let _ = channels.snap_return_tx.send(snap);
    }

    if let Err(e) = handle.join() {
        eprintln!("simulation thread panicked: {e:?}");
    }

    if let Some(w) = writer {
        let frames = w.frame_count();
        match w.finish() {
            Ok(()) => eprintln!("Recorded {frames} frames."),
            Err(e) => eprintln!("Warning: manifest write failed: {e}"),
        }
    }

    println!("{}: {} steps complete", model.label(), last_step);
}
