//! Numerical integration of f over [a, b]: left-endpoint rectangles,
//! trapezoids, and mean-value Monte Carlo, each with a rank-parallel
//! variant that splits the work across threads and reduces by summation.

use std::sync::mpsc;
use std::thread;

use crate::state::Xor128;

/// Left-endpoint Riemann sum over `n` panels.
pub fn rectangle<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let dx = (b - a) / n as f64;
    let mut sum = 0.0;
    for i in 0..n {
        sum += f(a + i as f64 * dx) * dx;
    }
    sum
}

/// Trapezoid rule over `n` panels: each panel contributes
/// `dx/2 * (f(x_i) + f(x_{i+1}))`.
pub fn trapezoid<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let dx = (b - a) / n as f64;
    let mut sum = 0.5 * (f(a) + f(b));
    for i in 1..n {
        sum += f(a + i as f64 * dx);
    }
    sum * dx
}

/// Mean-value Monte Carlo estimate: `(b-a) * <f>` over uniform samples.
/// Deterministic for a fixed seed.
pub fn monte_carlo<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, samples: usize, seed: u32) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    let mut rng = Xor128::new(seed);
    let mut sum = 0.0;
    for _ in 0..samples {
        sum += f(rng.next_range(a, b));
    }
    (b - a) * sum / samples as f64
}

/// Monte Carlo pi: fraction of [-1,1)^2 samples landing inside the unit
/// circle, times 4.
pub fn monte_carlo_pi(samples: usize, seed: u32) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    let mut rng = Xor128::new(seed);
    let mut hits = 0usize;
    for _ in 0..samples {
        let x = rng.next_range(-1.0, 1.0);
        let y = rng.next_range(-1.0, 1.0);
        if x * x + y * y < 1.0 {
            hits += 1;
        }
    }
    4.0 * hits as f64 / samples as f64
}

pub mod parallel {
    use super::*;

    /// Work items for `rank` out of `size`: an even `n / size` share, with
    /// the remainder going to the last rank.
    fn share(n: usize, size: usize, rank: usize) -> usize {
        n / size + if rank + 1 == size { n % size } else { 0 }
    }

    /// Run `size` workers, each producing a partial via `work(rank)`, and
    /// reduce in rank order so the result is independent of completion
    /// order.
    fn reduce<W>(size: usize, work: W) -> f64
    where
        W: Fn(usize) -> f64 + Sync,
    {
        let (tx, rx) = mpsc::channel::<(usize, f64)>();
        thread::scope(|s| {
            for rank in 0..size {
                let tx = tx.clone();
                let work = &work;
                s.spawn(move || {
                    let _ = tx.send((rank, work(rank)));
                });
            }
        });
        drop(tx);
        let mut partials: Vec<(usize, f64)> = rx.iter().collect();
        partials.sort_by_key(|&(rank, _)| rank);
        partials.into_iter().map(|(_, v)| v).sum()
    }

    /// Rank-parallel rectangle rule: identical panels, split by offset.
    pub fn rectangle<F>(f: F, a: f64, b: f64, n: usize, threads: usize) -> f64
    where
        F: Fn(f64) -> f64 + Sync,
    {
        if n == 0 {
            return 0.0;
        }
        let size = threads.max(1).min(n);
        let dx = (b - a) / n as f64;
        reduce(size, |rank| {
            let base = rank * (n / size);
            let count = share(n, size, rank);
            let mut sum = 0.0;
            for i in 0..count {
                sum += f(a + (base + i) as f64 * dx) * dx;
            }
            sum
        })
    }

    /// Rank-parallel trapezoid rule: each rank integrates its own
    /// subinterval with the serial rule, partials sum to the whole.
    pub fn trapezoid<F>(f: F, a: f64, b: f64, n: usize, threads: usize) -> f64
    where
        F: Fn(f64) -> f64 + Sync,
    {
        if n == 0 {
            return 0.0;
        }
        let size = threads.max(1).min(n);
        let dx = (b - a) / n as f64;
        reduce(size, |rank| {
            let base = rank * (n / size);
            let count = share(n, size, rank);
            let lo = a + base as f64 * dx;
            let hi = lo + count as f64 * dx;
            super::trapezoid(&f, lo, hi, count)
        })
    }

    /// Rank-parallel Monte Carlo: each rank draws its own share from an
    /// independent stream seeded by `seed + rank`.
    pub fn monte_carlo<F>(f: F, a: f64, b: f64, samples: usize, seed: u32, threads: usize) -> f64
    where
        F: Fn(f64) -> f64 + Sync,
    {
        if samples == 0 {
            return 0.0;
        }
        let size = threads.max(1).min(samples);
        let mean = reduce(size, |rank| {
            let count = share(samples, size, rank);
            let mut rng = Xor128::new(seed.wrapping_add(rank as u32));
            let mut sum = 0.0;
            for _ in 0..count {
                sum += f(rng.next_range(a, b));
            }
            sum
        }) / samples as f64;
        (b - a) * mean
    }

    /// Rank-parallel Monte Carlo pi.
    pub fn monte_carlo_pi(samples: usize, seed: u32, threads: usize) -> f64 {
        if samples == 0 {
            return 0.0;
        }
        let size = threads.max(1).min(samples);
        let hits = reduce(size, |rank| {
            let count = share(samples, size, rank);
            let mut rng = Xor128::new(seed.wrapping_add(rank as u32));
            let mut hits = 0usize;
            for _ in 0..count {
                let x = rng.next_range(-1.0, 1.0);
                let y = rng.next_range(-1.0, 1.0);
                if x * x + y * y < 1.0 {
                    hits += 1;
                }
            }
            hits as f64
        });
        4.0 * hits / samples as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    // The reference integrand: cos over [0, 3*pi/2], exact value -1.
    const XMAX: f64 = 3.0 * PI / 2.0;

    #[test]
    fn test_rectangle_cos() {
        let integral = rectangle(f64::cos, 0.0, XMAX, 1000);
        assert!(
            (integral - (-1.0)).abs() < 5e-3,
            "first-order rule on 1000 panels: {}",
            integral
        );
    }

    #[test]
    fn test_trapezoid_cos() {
        let integral = trapezoid(f64::cos, 0.0, XMAX, 1000);
        assert!(
            (integral - (-1.0)).abs() < 5e-6,
            "second-order rule on 1000 panels: {}",
            integral
        );
    }

    #[test]
    fn test_trapezoid_exact_for_linear() {
        // Trapezoids integrate affine functions exactly.
        let integral = trapezoid(|x| 3.0 * x + 1.0, 0.0, 2.0, 7);
        assert!((integral - 8.0).abs() < 1e-12, "got {}", integral);
    }

    #[test]
    fn test_monte_carlo_cos() {
        let integral = monte_carlo(f64::cos, 0.0, XMAX, 1_000_000, 42);
        assert!((integral - (-1.0)).abs() < 0.02, "got {}", integral);
    }

    #[test]
    fn test_monte_carlo_deterministic() {
        let a = monte_carlo(f64::cos, 0.0, XMAX, 10_000, 7);
        let b = monte_carlo(f64::cos, 0.0, XMAX, 10_000, 7);
        assert_eq!(a, b, "fixed seed must reproduce");
        let c = monte_carlo(f64::cos, 0.0, XMAX, 10_000, 8);
        assert_ne!(a, c, "different seed, different estimate");
    }

    #[test]
    fn test_monte_carlo_pi() {
        let pi = monte_carlo_pi(1_000_000, 42);
        assert!((pi - PI).abs() < 0.02, "got {}", pi);
    }

    #[test]
    fn test_zero_work_is_zero() {
        assert_eq!(rectangle(f64::cos, 0.0, 1.0, 0), 0.0);
        assert_eq!(trapezoid(f64::cos, 0.0, 1.0, 0), 0.0);
        assert_eq!(monte_carlo(f64::cos, 0.0, 1.0, 0, 1), 0.0);
        assert_eq!(monte_carlo_pi(0, 1), 0.0);
    }

    #[test]
    fn test_parallel_rectangle_matches_serial() {
        let serial = rectangle(f64::cos, 0.0, XMAX, 999);
        for threads in [1, 2, 4, 7] {
            let par = parallel::rectangle(f64::cos, 0.0, XMAX, 999, threads);
            assert!(
                (par - serial).abs() < 1e-12,
                "threads={}: {} vs {}",
                threads, par, serial
            );
        }
    }

    #[test]
    fn test_parallel_trapezoid_matches_serial() {
        let serial = trapezoid(f64::cos, 0.0, XMAX, 1000);
        for threads in [1, 3, 8] {
            let par = parallel::trapezoid(f64::cos, 0.0, XMAX, 1000, threads);
            assert!(
                (par - serial).abs() < 1e-10,
                "threads={}: {} vs {}",
                threads, par, serial
            );
        }
    }

    #[test]
    fn test_parallel_reduction_deterministic() {
        let a = parallel::monte_carlo(f64::cos, 0.0, XMAX, 100_000, 42, 4);
        let b = parallel::monte_carlo(f64::cos, 0.0, XMAX, 100_000, 42, 4);
        assert_eq!(a, b, "rank-ordered reduction must reproduce exactly");
        assert!((a - (-1.0)).abs() < 0.05, "got {}", a);
    }

    #[test]
    fn test_parallel_pi_converges() {
        let pi = parallel::monte_carlo_pi(1_000_000, 42, 4);
        assert!((pi - PI).abs() < 0.02, "got {}", pi);
    }

    #[test]
    fn test_more_threads_than_work() {
        let par = parallel::rectangle(f64::cos, 0.0, XMAX, 3, 64);
        let serial = rectangle(f64::cos, 0.0, XMAX, 3);
        assert!((par - serial).abs() < 1e-12);
    }
}
