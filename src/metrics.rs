use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use once_cell::sync::{Lazy, OnceCell};
use prometheus::{
    histogram_opts, Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::{debug, error};

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);
static REGISTER_ONCE: OnceCell<()> = OnceCell::new();
static PATH_REQUESTS: OnceCell<IntCounterVec> = OnceCell::new();
static RESOURCE_LOOKUPS: OnceCell<IntCounterVec> = OnceCell::new();
static GENERATION_LATENCY: OnceCell<HistogramVec> = OnceCell::new();

pub fn register_metrics() {
    REGISTER_ONCE.get_or_init(|| {
        let registry = global_registry();
        register_request_metrics(registry);
        register_lookup_metrics(registry);
    });
}

fn register_request_metrics(registry: &Registry) {
    let requests = IntCounterVec::new(
        Opts::new(
            "learnpath_requests_total",
            "Learning path requests grouped by outcome",
        ),
        &["result"],
    )
    .expect("create request counter");
    if let Err(err) = registry.register(Box::new(requests.clone())) {
        error!(?err, "failed to register request counter");
    }
    let _ = PATH_REQUESTS.set(requests);

    let latency = HistogramVec::new(
        histogram_opts!(
            "learnpath_generation_latency_ms",
            "End-to-end generation latency including enrichment (milliseconds)",
            vec![250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0, 60000.0, 180000.0]
        ),
        &["generator", "result"],
    )
    .expect("create generation latency histogram");
    if let Err(err) = registry.register(Box::new(latency.clone())) {
        error!(?err, "failed to register generation latency histogram");
    }
    let _ = GENERATION_LATENCY.set(latency);
}

fn register_lookup_metrics(registry: &Registry) {
    let lookups = IntCounterVec::new(
        Opts::new(
            "learnpath_resource_lookups_total",
            "Search lookups grouped by result (verified, miss, error)",
        ),
        &["result"],
    )
    .expect("create lookup counter");
    if let Err(err) = registry.register(Box::new(lookups.clone())) {
        error!(?err, "failed to register lookup counter");
    }
    let _ = RESOURCE_LOOKUPS.set(lookups);
}

pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

pub fn record_path_request(result: &str) {
    register_metrics();
    if let Some(counter) = PATH_REQUESTS.get() {
        counter.with_label_values(&[result]).inc();
    }
}

pub fn record_resource_lookup(result: &str) {
    register_metrics();
    if let Some(counter) = RESOURCE_LOOKUPS.get() {
        counter.with_label_values(&[result]).inc();
    }
    debug!(target: "search", %result, "resource lookup metric");
}

pub fn observe_generation_latency(generator: &str, result: &str, elapsed_ms: u64) {
    register_metrics();
    if let Some(histogram) = GENERATION_LATENCY.get() {
        histogram
            .with_label_values(&[generator, result])
            .observe(elapsed_ms as f64);
    }
}

/// Render the registry in the prometheus text format.
pub fn render() -> Result<(String, String), prometheus::Error> {
    register_metrics();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&global_registry().gather(), &mut buffer)?;
    let body = String::from_utf8_lossy(&buffer).into_owned();
    Ok((encoder.format_type().to_string(), body))
}

pub async fn metrics_handler() -> Response {
    match render() {
        Ok((content_type, body)) => {
            let mut response = body.into_response();
            if let Ok(value) = HeaderValue::from_str(&content_type) {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            response
        }
        Err(err) => {
            error!(?err, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}
