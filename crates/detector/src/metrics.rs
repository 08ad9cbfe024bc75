use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

/// Instruments recorded by the detector.
///
/// Built from the global meter, so they are no-ops until the host
/// application installs a meter provider.
pub struct DetectorMetrics {
    duration: Histogram<f64>,
    classifications: Counter<u64>,
    failures: Counter<u64>,
    model_loads: Counter<u64>,
}

impl DetectorMetrics {
    pub fn new(meter_name: &'static str) -> Self {
        let meter = global::meter(meter_name);
        let latency_buckets = [
            0.005, 0.01, 0.02, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 0.75, 1.0, 2.0, 5.0,
        ];

        let duration = meter
            .f64_histogram("nsfw_classification_duration_seconds")
            .with_description("Time to classify one image (decode + normalize + infer)")
            .with_unit("s")
            .with_boundaries(latency_buckets.to_vec())
            .build();
        let classifications = meter
            .u64_counter("nsfw_classifications_total")
            .with_description("Total images classified")
            .build();
        let failures = meter
            .u64_counter("nsfw_classification_failures_total")
            .with_description("Classifications that returned an error, by kind")
            .build();
        let model_loads = meter
            .u64_counter("nsfw_model_loads_total")
            .with_description("Model load attempts")
            .build();

        Self {
            duration,
            classifications,
            failures,
            model_loads,
        }
    }

    pub fn record_success(&self, seconds: f64) {
        self.duration.record(seconds, &[]);
        self.classifications.add(1, &[]);
    }

    pub fn record_failure(&self, kind: &'static str) {
        self.failures.add(1, &[KeyValue::new("kind", kind)]);
    }

    pub fn record_model_load(&self, ok: bool) {
        self.model_loads.add(1, &[KeyValue::new("success", ok)]);
    }
}
