//! Parameter-sweep harness: times `gebp` over a fixed grid of block sizes
//! and records achieved throughput against a theoretical per-core peak.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;

use gebp::matrix::{print_matrix, random_matrix};
use gebp::report::{RunMetrics, CSV_HEADER};

/// L1 data cache size in bytes. The B sliver and C block live here.
const CACHE_L1_SIZE: usize = 32 * 1024;

/// L2 cache size in bytes. The packed A block lives here.
const CACHE_L2_SIZE: usize = 256 * 1024;

/// Max clock frequency of one CPU core in GHz.
const MAX_FREQ_GHZ: f64 = 3.97;

/// Theoretical peak GFLOPS per core:
/// frequency x (4 doubles per AVX register) x (2 for FMA) x (2 AVX units).
const MAX_GFLOPS: f64 = MAX_FREQ_GHZ * 4.0 * 2.0 * 2.0;

/// Default dimension of the matrices.
const DEFAULT_N: usize = 1024 * 3;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let debug = args.get(1).map(|s| s == "1").unwrap_or(false);
    let n: usize = match args.get(2).map(|s| s.parse()) {
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            eprintln!("invalid matrix dimension: {}", args[2]);
            return ExitCode::FAILURE;
        }
        None => DEFAULT_N,
    };
    let csv_path = args.get(3).map(String::as_str).unwrap_or("gebp_results.csv");

    let file = match File::create(csv_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("unable to open {} for writing: {}", csv_path, e);
            return ExitCode::FAILURE;
        }
    };
    let mut csv = BufWriter::new(file);

    let mut rng = StdRng::seed_from_u64(42);
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);
    let mut c = vec![0.0; n * n];

    // Sweep grid: k_c scales with the matrix, m_c tracks k_c, and the
    // register/panel tiles cover a small fixed set.
    let kc_sizes = [n / 32, n / 30, n / 28, n / 24, n / 20];
    let mr_sizes = [4, 8, 16, 32, 96];
    let nr_sizes = [4, 8, 16];

    let l1_kb = CACHE_L1_SIZE as f64 / 1024.0;
    let l2_kb = CACHE_L2_SIZE as f64 / 1024.0;

    println!(
        "GEBP parameter sweep started {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("Debug mode: {}", if debug { "ON" } else { "OFF" });

    if let Err(e) = writeln!(csv, "{}", CSV_HEADER) {
        eprintln!("unable to write {}: {}", csv_path, e);
        return ExitCode::FAILURE;
    }

    for &k_c in &kc_sizes {
        for &m_r in &mr_sizes {
            for &n_r in &nr_sizes {
                println!("---------------------------------------");
                let m_c = k_c;

                // C carries the previous run's product, reset before timing.
                c.fill(0.0);

                if debug {
                    print_matrix(&a, n, n, "A");
                    print_matrix(&b, n, n, "B");
                }

                println!("Matrix Sizes: {}x{}", n, n);
                println!(
                    "Block Sizes: m_c = {}, k_c = {}, n_r = {}, m_r = {}",
                    m_c, k_c, n_r, m_r
                );

                let start = Instant::now();
                match gebp::gebp(n, &a, &b, &mut c, m_c, k_c, n_r, m_r) {
                    Ok(()) => {}
                    Err(e) => {
                        // Rejected configurations are reported and skipped;
                        // the rest of the sweep still runs.
                        println!("Skipping configuration: {}", e);
                        continue;
                    }
                }
                let seconds = start.elapsed().as_secs_f64();

                let metrics = RunMetrics::new(n, m_c, k_c, n_r, m_r, seconds, MAX_GFLOPS);
                metrics.print(l1_kb, l2_kb);
                if let Err(e) = writeln!(csv, "{}", metrics.csv_row(l1_kb, l2_kb)) {
                    eprintln!("unable to write {}: {}", csv_path, e);
                    return ExitCode::FAILURE;
                }

                if debug {
                    print_matrix(&c, n, n, "C");
                }
            }
        }
    }

    if let Err(e) = csv.flush() {
        eprintln!("unable to write {}: {}", csv_path, e);
        return ExitCode::FAILURE;
    }

    println!("Results written to {}", csv_path);
    ExitCode::SUCCESS
}
