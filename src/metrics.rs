//! Render-pass statistics for the interactive session.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for render passes
pub struct RenderMetrics {
    /// Successful render passes
    pub renders: AtomicU64,
    /// Render passes that failed in a pipeline
    pub failures: AtomicU64,
    /// Render times (in microseconds)
    render_times: RwLock<Vec<u64>>,
    /// Resilience labels shown, by label
    labels: RwLock<BTreeMap<String, u64>>,
    /// Running yield sum and extremes (kg/ha)
    yields: RwLock<YieldSummary>,
    start_time: Instant,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self {
            renders: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            render_times: RwLock::new(Vec::with_capacity(256)),
            labels: RwLock::new(BTreeMap::new()),
            yields: RwLock::new(YieldSummary::default()),
            start_time: Instant::now(),
        }
    }

    /// Record a successful render pass
    pub fn record_render(&self, render_time: Duration, yield_kg_per_ha: f64, resilience_label: &str) {
        self.renders.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.render_times.write() {
            times.push(render_time.as_micros() as u64);
            // Keep only the most recent passes
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        if let Ok(mut labels) = self.labels.write() {
            *labels.entry(resilience_label.to_string()).or_insert(0) += 1;
        }

        if let Ok(mut yields) = self.yields.write() {
            yields.add(yield_kg_per_ha);
        }
    }

    /// Record a render pass aborted by a pipeline error
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get render time statistics
    pub fn get_render_stats(&self) -> RenderStats {
        let mut sorted = match self.render_times.read() {
            Ok(times) => times.clone(),
            Err(_) => return RenderStats::default(),
        };
        if sorted.is_empty() {
            return RenderStats::default();
        }
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let p99_index = ((count as f64 * 0.99) as usize).min(count - 1);

        RenderStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[p99_index],
            max_us: sorted[count - 1],
        }
    }

    /// Get resilience labels shown, by label
    pub fn get_label_counts(&self) -> BTreeMap<String, u64> {
        self.labels
            .read()
            .map(|labels| labels.clone())
            .unwrap_or_default()
    }

    /// Get the yield summary over all successful passes
    pub fn get_yield_summary(&self) -> YieldSummary {
        self.yields.read().map(|y| *y).unwrap_or_default()
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let renders = self.renders.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let stats = self.get_render_stats();
        let yields = self.get_yield_summary();
        let labels = self.get_label_counts();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              CROP RESILIENCE ADVISOR - SESSION SUMMARY       ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Render Passes: {:>8}  │  Failed: {:>6}  │  Uptime: {:>6.0}s ║",
            renders,
            failures,
            self.start_time.elapsed().as_secs_f64()
        );
        info!(
            "║ Render Time (μs): mean={:>6} p50={:>6} p99={:>6} max={:>6} ║",
            stats.mean_us, stats.p50_us, stats.p99_us, stats.max_us
        );
        if let Some(mean) = yields.mean() {
            info!(
                "║ Yield (kg/ha): min={:>7.0} mean={:>7.0} max={:>7.0}          ║",
                yields.min, mean, yields.max
            );
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Resilience Levels Shown:                                     ║");
        for (label, count) in &labels {
            let pct = if renders > 0 {
                (*count as f64 / renders as f64) * 100.0
            } else {
                0.0
            };
            info!("║   {:10}: {:>6} ({:>5.1}%)                                ║", label, count, pct);
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Render time statistics
#[derive(Debug, Default, PartialEq)]
pub struct RenderStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Running summary of predicted yields
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YieldSummary {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl YieldSummary {
    fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = RenderMetrics::new();

        metrics.record_render(Duration::from_micros(100), 2500.0, "High");
        metrics.record_render(Duration::from_micros(300), 1500.0, "Low");
        metrics.record_render(Duration::from_micros(200), 2000.0, "High");
        metrics.record_failure();

        assert_eq!(metrics.renders.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 1);

        let labels = metrics.get_label_counts();
        assert_eq!(labels.get("High"), Some(&2));
        assert_eq!(labels.get("Low"), Some(&1));
    }

    #[test]
    fn test_render_stats() {
        let metrics = RenderMetrics::new();
        assert_eq!(metrics.get_render_stats(), RenderStats::default());

        for us in [100, 200, 300, 400] {
            metrics.record_render(Duration::from_micros(us), 1.0, "Medium");
        }

        let stats = metrics.get_render_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean_us, 250);
        assert_eq!(stats.p50_us, 300);
        assert_eq!(stats.p99_us, 400);
        assert_eq!(stats.max_us, 400);
    }

    #[test]
    fn test_yield_summary() {
        let metrics = RenderMetrics::new();
        assert_eq!(metrics.get_yield_summary().mean(), None);

        metrics.record_render(Duration::from_micros(1), 3000.0, "High");
        metrics.record_render(Duration::from_micros(1), 1000.0, "Low");

        let yields = metrics.get_yield_summary();
        assert_eq!(yields.min, 1000.0);
        assert_eq!(yields.max, 3000.0);
        assert_eq!(yields.mean(), Some(2000.0));
    }
}
