// Prometheus metrics exposed at GET /metrics

use lazy_static::lazy_static;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref SYNTHESIS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("testsmith_synthesis_total", "Harness programs synthesized"),
        &["language"]
    )
    .expect("valid metric definition");
    pub static ref RUNS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("testsmith_runs_total", "Judge runs by outcome"),
        &["status"]
    )
    .expect("valid metric definition");
    pub static ref JUDGE_SECONDS: Histogram = Histogram::with_opts(HistogramOpts::new(
        "testsmith_judge_seconds",
        "Synthesize-judge-recover round-trip latency"
    ))
    .expect("valid metric definition");
    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        let _ = registry.register(Box::new(SYNTHESIS_TOTAL.clone()));
        let _ = registry.register(Box::new(RUNS_TOTAL.clone()));
        let _ = registry.register(Box::new(JUDGE_SECONDS.clone()));
        registry
    };
}

/// Text exposition of every registered metric
pub fn render() -> Result<String, prometheus::Error> {
    TextEncoder::new().encode_to_string(&REGISTRY.gather())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_counters() {
        SYNTHESIS_TOTAL.with_label_values(&["python"]).inc();
        let text = render().unwrap();
        assert!(text.contains("testsmith_synthesis_total{language=\"python\"}"));
        assert!(text.contains("testsmith_judge_seconds"));
    }
}
