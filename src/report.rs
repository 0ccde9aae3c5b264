//! Derived benchmark metrics and their pretty-printed / CSV forms.

use std::fmt::Write as _;

/// Header row for the sweep CSV, one column per recorded metric.
pub const CSV_HEADER: &str =
    "kc/mc,nr,mr,gflops,time (seconds),util,A block (KB),B sliver (KB)";

/// Metrics derived from one timed `gebp` run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMetrics {
    pub k_c: usize,
    pub n_r: usize,
    pub m_r: usize,
    pub seconds: f64,
    pub gflops: f64,
    /// Achieved GFLOPS divided by the configured peak.
    pub utilization: f64,
    /// Packed A block footprint in KB, held against the L2 cache.
    pub a_block_kb: usize,
    /// B sliver plus C block footprint in KB, held against the L1 cache.
    pub b_sliver_kb: usize,
}

impl RunMetrics {
    /// Derives the metrics for one sweep point. `m_c` is the row-panel
    /// height (equal to `k_c` in the sweep), `peak_gflops` the theoretical
    /// single-core peak used for the utilization figure.
    pub fn new(
        n: usize,
        m_c: usize,
        k_c: usize,
        n_r: usize,
        m_r: usize,
        seconds: f64,
        peak_gflops: f64,
    ) -> Self {
        // A multiply-add per inner-product step: 2 * n^3 flops total.
        let gflops = 2.0 * (n as f64).powi(3) / seconds / 1e9;

        const ELEM_SIZE: usize = std::mem::size_of::<f64>();
        RunMetrics {
            k_c,
            n_r,
            m_r,
            seconds,
            gflops,
            utilization: gflops / peak_gflops,
            a_block_kb: m_c * k_c * ELEM_SIZE / 1024,
            b_sliver_kb: n_r * m_c * 2 * ELEM_SIZE / 1024,
        }
    }

    /// Prints the run summary the way the sweep log reads, with each cache
    /// footprint shown against the cache size it has to fit in.
    pub fn print(&self, l1_kb: f64, l2_kb: f64) {
        println!("Time taken: {:.6} seconds", self.seconds);
        println!("GFLOPS: {:.6}", self.gflops);
        println!("GFLOPS Utilization: {:.6}", self.utilization);
        println!(
            "B sliver size (KB)/L1 Cache size: {}/{:.2}",
            self.b_sliver_kb, l1_kb
        );
        println!(
            "A block size (KB)/L2 Cache size: {}/{:.2}",
            self.a_block_kb, l2_kb
        );
        println!("---------------------------------------");
    }

    /// Formats one CSV row matching [`CSV_HEADER`].
    pub fn csv_row(&self, l1_kb: f64, l2_kb: f64) -> String {
        let mut row = String::new();
        let _ = write!(
            row,
            "{},{},{},{:.6},{:.6},{:.6},{}/{:.2},{}/{:.2}",
            self.k_c,
            self.n_r,
            self.m_r,
            self.gflops,
            self.seconds,
            self.utilization,
            self.a_block_kb,
            l2_kb,
            self.b_sliver_kb,
            l1_kb
        );
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gflops_and_utilization() {
        // 2 * 1000^3 flops in one second is exactly 2 GFLOPS.
        let m = RunMetrics::new(1000, 50, 50, 8, 4, 1.0, 8.0);
        assert!((m.gflops - 2.0).abs() < 1e-12);
        assert!((m.utilization - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_cache_footprints() {
        let m = RunMetrics::new(1024, 64, 64, 16, 8, 0.5, 32.0);
        // A block: 64 * 64 doubles = 32 KB; sliver + C block: 16 * 64 * 2.
        assert_eq!(m.a_block_kb, 32);
        assert_eq!(m.b_sliver_kb, 16);
    }

    #[test]
    fn test_csv_row_shape() {
        let m = RunMetrics::new(512, 16, 16, 4, 8, 0.25, 32.0);
        let row = m.csv_row(32.0, 256.0);
        assert_eq!(row.split(',').count(), CSV_HEADER.split(',').count());
        assert!(row.starts_with("16,4,8,"));
    }
}
