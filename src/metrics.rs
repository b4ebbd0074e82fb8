//! Prometheus metrics for the service.
//!
//! A single counter, `request_count`, labelled by `endpoint`, lives in a
//! private `Registry` owned by `Metrics`. Clones share the registry, so the
//! handle can be injected into every request handler.

use std::fmt::Write as _;
use std::sync::Arc;

use prometheus::core::{Collector, Desc};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Name of the request counter
pub const REQUEST_COUNT: &str = "request_count";

/// Help text of the request counter
pub const REQUEST_COUNT_HELP: &str = "Total HTTP requests";

/// Label carrying the request path
pub const ENDPOINT_LABEL: &str = "endpoint";

/// Process-wide metrics handle.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    request_count: IntCounterVec,
}

impl Metrics {
    /// Create the registry and register the request counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter options are invalid or registration fails.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let request_count = IntCounterVec::new(
            Opts::new(REQUEST_COUNT, REQUEST_COUNT_HELP),
            &[ENDPOINT_LABEL],
        )?;
        registry.register(Box::new(request_count.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            request_count,
        })
    }

    /// Count one request to `endpoint`, creating the series on first use.
    pub fn record_request(&self, endpoint: &str) {
        self.request_count.with_label_values(&[endpoint]).inc();
    }

    /// Current count for `endpoint`, or `None` if it was never recorded.
    ///
    /// Test helper. Reads the gathered families rather than the vector,
    /// because looking a series up on `IntCounterVec` creates it.
    #[doc(hidden)]
    pub fn request_count(&self, endpoint: &str) -> Option<u64> {
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == REQUEST_COUNT)
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                metric
                    .get_label()
                    .iter()
                    .any(|label| label.get_name() == ENDPOINT_LABEL && label.get_value() == endpoint)
            })
            .map(|metric| metric.get_counter().value() as u64)
    }

    /// Render every registered metric in the Prometheus text format.
    ///
    /// Families without any series are still announced with their HELP and
    /// TYPE lines, so a fresh process exposes `request_count` with no samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder fails or produces invalid UTF-8.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        let mut text = String::from_utf8(buffer).map_err(|e| {
            tracing::error!(error = %e, "Prometheus encoder produced invalid UTF-8");
            prometheus::Error::Msg(format!("metrics output is not UTF-8: {}", e))
        })?;

        for desc in self.request_count.desc() {
            if !announces(&text, &desc.fq_name) {
                write_header(&mut text, desc, "counter");
            }
        }

        Ok(text)
    }
}

fn announces(text: &str, name: &str) -> bool {
    let type_line = format!("# TYPE {} ", name);
    text.lines().any(|line| line.starts_with(&type_line))
}

fn write_header(out: &mut String, desc: &Desc, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", desc.fq_name, escape_help(&desc.help));
    let _ = writeln!(out, "# TYPE {} {}", desc.fq_name, kind);
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines(text: &str) -> Vec<&str> {
        text.lines().filter(|l| !l.starts_with('#')).collect()
    }

    #[test]
    fn fresh_registry_announces_counter_without_samples() {
        let metrics = Metrics::new().unwrap();
        let output = metrics.render().unwrap();

        assert_eq!(
            output,
            "# HELP request_count Total HTTP requests\n# TYPE request_count counter\n"
        );
        assert!(sample_lines(&output).is_empty());
    }

    #[test]
    fn recorded_requests_render_as_labelled_samples() {
        let metrics = Metrics::new().unwrap();
        for _ in 0..3 {
            metrics.record_request("/");
        }

        let output = metrics.render().unwrap();
        assert!(output.contains("# HELP request_count Total HTTP requests"));
        assert!(output.contains("# TYPE request_count counter"));
        assert_eq!(sample_lines(&output), vec!["request_count{endpoint=\"/\"} 3"]);
    }

    #[test]
    fn header_is_not_duplicated_once_samples_exist() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("/");

        let output = metrics.render().unwrap();
        assert_eq!(output.matches("# TYPE request_count").count(), 1);
        assert_eq!(output.matches("# HELP request_count").count(), 1);
    }

    #[test]
    fn endpoints_are_counted_separately() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("/");
        metrics.record_request("/");
        metrics.record_request("/other");

        assert_eq!(metrics.request_count("/"), Some(2));
        assert_eq!(metrics.request_count("/other"), Some(1));
    }

    #[test]
    fn unrecorded_endpoint_has_no_count_and_stays_absent() {
        let metrics = Metrics::new().unwrap();

        assert_eq!(metrics.request_count("/"), None);
        let output = metrics.render().unwrap();
        assert!(sample_lines(&output).is_empty());
    }

    #[test]
    fn clones_share_the_registry() {
        let metrics = Metrics::new().unwrap();
        let cloned = metrics.clone();

        metrics.record_request("/");

        assert_eq!(cloned.request_count("/"), Some(1));
        assert!(cloned.render().unwrap().contains("request_count{endpoint=\"/\"} 1"));
    }

    #[test]
    fn separate_instances_do_not_share_counts() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();

        a.record_request("/");

        assert_eq!(b.request_count("/"), None);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let metrics = Metrics::new().unwrap();
        let threads = 8;
        let per_thread = 1000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..per_thread {
                        metrics.record_request("/");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.request_count("/"), Some(threads * per_thread));
    }
}
