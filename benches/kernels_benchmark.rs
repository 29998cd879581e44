//! Timing harness for the three kernel families.
//!
//! Checks that:
//! 1. Unpacking scales linearly with the byte count at every depth
//! 2. The running median stays O(N log W) as the window grows
//! 3. Repeated real FFTs of one length reuse the cached plan (first call is the slow one)

use sigproc_kernels::operations::codec::unpack;
use sigproc_kernels::operations::statistics::{running_mean, running_median};
use sigproc_kernels::operations::transforms::{forward_real_transform, inverse_real_transform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Seeded uniform noise so runs are comparable.
fn test_signal(n_samples: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(0x5167_0000);
    (0..n_samples).map(|_| rng.gen_range(0.0f32..1.0)).collect()
}

/// Runs `f` `runs` times after a warm-up and prints mean, median and range in ms.
fn time_runs<F: FnMut()>(label: &str, runs: usize, mut f: F) {
    for _ in 0..3 {
        f();
    }
    let mut times: Vec<f64> = (0..runs)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed().as_secs_f64() * 1000.0
        })
        .collect();
    times.sort_by(f64::total_cmp);
    let mean = times.iter().sum::<f64>() / times.len() as f64;
    println!(
        "{label:<40} {mean:>9.3}ms (median: {:.3}ms, range: {:.3}-{:.3}ms)",
        times[times.len() / 2],
        times[0],
        times[times.len() - 1]
    );
}

fn benchmark_codec() {
    println!("Bit-depth codec");
    let mut rng = StdRng::seed_from_u64(7);
    let packed: Vec<u8> = (0..4_000_000).map(|_| rng.r#gen::<u8>()).collect();
    for nbits in [1u8, 2, 4, 8] {
        time_runs(&format!("unpack {nbits}-bit, 4 MB"), 10, || {
            let samples = unpack(&packed, nbits).expect("valid depth");
            assert_eq!(samples.len(), packed.len() * 8 / nbits as usize);
        });
    }
    println!();
}

fn benchmark_statistics() {
    println!("Running statistics, N = 1,000,000");
    let signal = test_signal(1_000_000);
    for window in [3usize, 101, 1001, 10_001] {
        time_runs(&format!("running_mean   W = {window}"), 5, || {
            running_mean(&signal, window).expect("valid window");
        });
        time_runs(&format!("running_median W = {window}"), 5, || {
            running_median(&signal, window).expect("valid window");
        });
    }
    println!();
}

fn benchmark_transforms() {
    println!("Real FFT round trip");
    for n_samples in [1 << 16, 1 << 20, 1_000_000, 999_983] {
        let signal = test_signal(n_samples);

        let start = Instant::now();
        let spectrum = forward_real_transform(&signal);
        println!(
            "first forward, N = {n_samples:<10} {:>9.3}ms (includes planning)",
            start.elapsed().as_secs_f64() * 1000.0
        );

        time_runs(&format!("forward + inverse, N = {n_samples}"), 5, || {
            let spectrum = forward_real_transform(&signal);
            inverse_real_transform(&spectrum, n_samples).expect("consistent length");
        });
        assert_eq!(spectrum.len(), 2 * (n_samples / 2 + 1));
    }
    println!();
}

fn main() {
    println!("sigproc_kernels benchmark");
    println!("=========================");
    println!();

    benchmark_codec();
    benchmark_statistics();
    benchmark_transforms();

    println!("Benchmark complete.");
}
