//! Timing and measurement primitives.
//!
//! [`MetricsCollector`] measures one contiguous wall-clock region and,
//! optionally, the peak allocation within it. [`BenchmarkResult`] holds a
//! single sample or an aggregate of many same-named samples and exposes the
//! derived statistics (mean/min/max/stdev).

use std::fmt;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use crate::alloc::AllocTracer;
use crate::error::{BenchError, Result};

/// One measurement, or an aggregate over repeated measurements of the same
/// named operation.
///
/// Raw samples come out of [`MetricsCollector::stop`] with an empty
/// `all_elapsed`; [`BenchmarkResult::aggregate`] combines them, retaining
/// every contributing duration so the statistics stay exact.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Operation identifier. Not unique across samples: every iteration of
    /// an operation produces a sample under the same name.
    pub name: String,
    /// Wall-clock duration of this sample, or the mean for an aggregate.
    pub elapsed: Duration,
    /// Peak traced allocation during the region, when tracking was on.
    pub peak_memory_bytes: Option<u64>,
    /// Open metadata attached by the measured code before the region closed.
    pub extra: Map<String, Value>,
    /// Every contributing duration, in encounter order. Empty for a raw
    /// sample.
    pub all_elapsed: Vec<Duration>,
}

impl BenchmarkResult {
    /// A raw sample with the given name and elapsed time.
    pub fn new(name: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            elapsed,
            peak_memory_bytes: None,
            extra: Map::new(),
            all_elapsed: Vec::new(),
        }
    }

    /// Zero-duration placeholder registered before an operation body runs,
    /// so the body can attach metadata that survives into the final result.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name, Duration::ZERO)
    }

    /// Number of samples behind this result (1 for a raw sample).
    pub fn runs(&self) -> usize {
        self.all_elapsed.len().max(1)
    }

    /// Mean wall-clock duration across aggregated runs.
    pub fn mean(&self) -> Duration {
        if self.all_elapsed.is_empty() {
            return self.elapsed;
        }
        let total: Duration = self.all_elapsed.iter().sum();
        total / self.all_elapsed.len() as u32
    }

    /// Minimum duration across aggregated runs.
    pub fn min(&self) -> Duration {
        self.all_elapsed.iter().min().copied().unwrap_or(self.elapsed)
    }

    /// Maximum duration across aggregated runs.
    pub fn max(&self) -> Duration {
        self.all_elapsed.iter().max().copied().unwrap_or(self.elapsed)
    }

    /// Sample standard deviation of the durations, defined only when two or
    /// more samples contributed.
    pub fn stdev(&self) -> Option<Duration> {
        let n = self.all_elapsed.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean().as_secs_f64();
        let variance = self
            .all_elapsed
            .iter()
            .map(|d| {
                let diff = d.as_secs_f64() - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1) as f64;
        Some(Duration::from_secs_f64(variance.sqrt()))
    }

    /// Combine samples from repeated runs into one aggregated result.
    ///
    /// The combined name and metadata are taken from the first sample;
    /// callers are expected to pass same-named samples (mixing names is not
    /// validated and silently uses the first). Peak memory is the maximum
    /// over the samples that tracked it, or `None` when none did.
    ///
    /// Fails with [`BenchError::Precondition`] on empty input.
    pub fn aggregate(samples: Vec<BenchmarkResult>) -> Result<BenchmarkResult> {
        let first = samples.first().ok_or_else(|| {
            BenchError::Precondition("cannot aggregate an empty list of samples".into())
        })?;

        let name = first.name.clone();
        let extra = first.extra.clone();
        let peak_memory_bytes = samples.iter().filter_map(|s| s.peak_memory_bytes).max();
        let all_elapsed: Vec<Duration> = samples.iter().map(|s| s.elapsed).collect();
        let total: Duration = all_elapsed.iter().sum();
        let elapsed = total / all_elapsed.len() as u32;

        Ok(BenchmarkResult {
            name,
            elapsed,
            peak_memory_bytes,
            extra,
            all_elapsed,
        })
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] mean={:.3}ms",
            self.name,
            self.mean().as_secs_f64() * 1000.0
        )?;
        let runs = self.runs();
        if runs > 1 {
            write!(f, " runs={runs}")?;
            if let Some(stdev) = self.stdev() {
                write!(f, " stdev={:.3}ms", stdev.as_secs_f64() * 1000.0)?;
            }
            write!(
                f,
                " min={:.3}ms max={:.3}ms",
                self.min().as_secs_f64() * 1000.0,
                self.max().as_secs_f64() * 1000.0
            )?;
        }
        if let Some(peak) = self.peak_memory_bytes {
            write!(f, " peak_mem={:.1}KB", peak as f64 / 1024.0)?;
        }
        Ok(())
    }
}

/// Measures one wall-clock region, optionally tracing peak allocation.
///
/// ```
/// use suitebench::metrics::MetricsCollector;
///
/// let mut collector = MetricsCollector::new(false);
/// collector.start();
/// // ... code under measurement ...
/// let sample = collector.stop("my operation").unwrap();
/// println!("{sample}");
/// ```
///
/// When memory tracking is enabled the collector owns the process-wide
/// allocation tracer for the duration of the region; at most one
/// memory-tracking collector may be active at a time.
#[derive(Debug)]
pub struct MetricsCollector {
    track_memory: bool,
    started: Option<Instant>,
}

impl MetricsCollector {
    pub fn new(track_memory: bool) -> Self {
        Self {
            track_memory,
            started: None,
        }
    }

    /// Begin timing. Starting again discards any unstopped prior region.
    pub fn start(&mut self) {
        if self.track_memory {
            AllocTracer::begin();
        }
        self.started = Some(Instant::now());
    }

    /// End timing and produce a sample under `name`.
    ///
    /// Fails with [`BenchError::InvalidState`] when called without a
    /// preceding [`MetricsCollector::start`].
    pub fn stop(&mut self, name: &str) -> Result<BenchmarkResult> {
        let started = self.started.take().ok_or_else(|| {
            BenchError::InvalidState("MetricsCollector::stop() called before start()".into())
        })?;
        let elapsed = started.elapsed();

        let mut sample = BenchmarkResult::new(name, elapsed);
        if self.track_memory {
            sample.peak_memory_bytes = Some(AllocTracer::finish());
        }
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::test_guard;
    use serde_json::json;
    use std::thread::sleep;

    fn sample(name: &str, ms: u64) -> BenchmarkResult {
        BenchmarkResult::new(name, Duration::from_millis(ms))
    }

    #[test]
    fn single_sample_statistics_collapse() {
        let s = sample("op", 5);
        assert_eq!(s.runs(), 1);
        assert_eq!(s.mean(), Duration::from_millis(5));
        assert_eq!(s.min(), Duration::from_millis(5));
        assert_eq!(s.max(), Duration::from_millis(5));
        assert!(s.stdev().is_none());
    }

    #[test]
    fn aggregate_computes_statistics() {
        let agg =
            BenchmarkResult::aggregate(vec![sample("op", 10), sample("op", 20), sample("op", 30)])
                .unwrap();
        assert_eq!(agg.name, "op");
        assert_eq!(agg.runs(), 3);
        assert_eq!(agg.mean(), Duration::from_millis(20));
        assert_eq!(agg.min(), Duration::from_millis(10));
        assert_eq!(agg.max(), Duration::from_millis(30));
        // Sample stdev of {10, 20, 30} ms is 10 ms.
        let stdev = agg.stdev().unwrap().as_secs_f64();
        assert!((stdev - 0.010).abs() < 1e-9);
    }

    #[test]
    fn aggregate_empty_is_precondition_error() {
        let err = BenchmarkResult::aggregate(Vec::new()).unwrap_err();
        assert!(matches!(err, BenchError::Precondition(_)));
    }

    #[test]
    fn aggregate_first_sample_wins_for_metadata() {
        let mut first = sample("op", 1);
        first.extra.insert("tokens".into(), json!(42));
        let mut second = sample("op", 3);
        second.extra.insert("tokens".into(), json!(99));

        let agg = BenchmarkResult::aggregate(vec![first, second]).unwrap();
        assert_eq!(agg.extra["tokens"], json!(42));
    }

    #[test]
    fn aggregate_peak_memory_is_max_of_tracked() {
        let mut a = sample("op", 1);
        a.peak_memory_bytes = Some(1024);
        let b = sample("op", 2);
        let mut c = sample("op", 3);
        c.peak_memory_bytes = Some(4096);

        let agg = BenchmarkResult::aggregate(vec![a, b, c]).unwrap();
        assert_eq!(agg.peak_memory_bytes, Some(4096));

        let untracked =
            BenchmarkResult::aggregate(vec![sample("op", 1), sample("op", 2)]).unwrap();
        assert!(untracked.peak_memory_bytes.is_none());
    }

    #[test]
    fn stop_without_start_is_invalid_state() {
        let mut collector = MetricsCollector::new(false);
        let err = collector.stop("op").unwrap_err();
        assert!(matches!(err, BenchError::InvalidState(_)));
    }

    #[test]
    fn start_twice_overwrites_marker() {
        let mut collector = MetricsCollector::new(false);
        collector.start();
        sleep(Duration::from_millis(20));
        collector.start();
        let sample = collector.stop("op").unwrap();
        // Only the second region counts.
        assert!(sample.elapsed < Duration::from_millis(20));
        // And the marker is consumed.
        assert!(collector.stop("op").is_err());
    }

    #[test]
    fn memory_tracking_disabled_yields_no_peak() {
        let mut collector = MetricsCollector::new(false);
        collector.start();
        let _data = vec![0u8; 64 * 1024];
        let sample = collector.stop("op").unwrap();
        assert!(sample.peak_memory_bytes.is_none());
    }

    #[test]
    fn memory_tracking_enabled_records_positive_peak() {
        let _guard = test_guard();
        let mut collector = MetricsCollector::new(true);
        collector.start();
        let data: Vec<Box<u64>> = (0..100_000u64).map(Box::new).collect();
        let sample = collector.stop("op").unwrap();
        drop(data);

        let peak = sample.peak_memory_bytes.unwrap();
        assert!(peak > 0, "expected positive peak, got {peak}");
    }

    #[test]
    fn display_single_and_aggregated() {
        let s = sample("parse", 1);
        assert_eq!(s.to_string(), "[parse] mean=1.000ms");

        let mut agg =
            BenchmarkResult::aggregate(vec![sample("parse", 1), sample("parse", 3)]).unwrap();
        agg.peak_memory_bytes = Some(2048);
        let rendered = agg.to_string();
        assert!(rendered.starts_with("[parse] mean=2.000ms runs=2 stdev="));
        assert!(rendered.contains("min=1.000ms max=3.000ms"));
        assert!(rendered.ends_with("peak_mem=2.0KB"));
    }
}
