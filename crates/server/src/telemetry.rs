use axum::{body::Body, extract::MatchedPath, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

use crate::config::env_var;
use crate::identity::Session;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const TRACER_NAME: &str = "arrest-intake";

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP span exporter: {0}")]
    SpanExporter(opentelemetry_otlp::ExporterBuildError),
    #[error("failed to build OTLP log exporter: {0}")]
    LogExporter(opentelemetry_otlp::ExporterBuildError),
    #[error("invalid ingestion key: {0}")]
    IngestionKey(String),
}

/// Set up the OTLP trace and log exporters and register them globally.
///
/// Must run inside the Tokio runtime. Returns `Ok(false)` when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is unset and nothing was configured.
///
/// Reads config from environment:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector gRPC address, e.g. `http://localhost:4317`
///   - `OTEL_SERVICE_NAME`: service name tag (default: `arrest-intake`)
///   - `OTEL_INGESTION_KEY`: collector access token sent as gRPC metadata (optional)
///   - `DEPLOY_ENV`: deployment environment tag (default: `development`)
pub fn init_telemetry() -> Result<bool, TelemetryError> {
    let Some(endpoint) = env_var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        tracing::info!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
        return Ok(false);
    };

    let service_name = env_var("OTEL_SERVICE_NAME").unwrap_or_else(|| TRACER_NAME.to_string());
    let environment = env_var("DEPLOY_ENV").unwrap_or_else(|| "development".to_string());
    let metadata = ingestion_metadata()?;

    let mut builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if endpoint.starts_with("https://") {
        builder = builder.with_tls_config(tls_config());
    }
    if let Some(md) = metadata.clone() {
        builder = builder.with_metadata(md);
    }
    let exporter = builder.build().map_err(TelemetryError::SpanExporter)?;

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(provider);

    // Log exporter fed by the `log` crate bridge.
    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if endpoint.starts_with("https://") {
        log_builder = log_builder.with_tls_config(tls_config());
    }
    if let Some(md) = metadata {
        log_builder = log_builder.with_metadata(md);
    }
    let log_exporter = log_builder.build().map_err(TelemetryError::LogExporter)?;

    let logger_provider = LOGGER_PROVIDER.get_or_init(|| {
        opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build()
    });

    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(logger_provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => tracing::warn!("Log bridge skipped, a `log` logger is already set"),
    }

    tracing::info!(%endpoint, version = APP_VERSION, "Telemetry initialized");
    Ok(true)
}

fn tls_config() -> opentelemetry_otlp::tonic_types::transport::ClientTlsConfig {
    opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots()
}

fn ingestion_metadata(
) -> Result<Option<opentelemetry_otlp::tonic_types::metadata::MetadataMap>, TelemetryError> {
    let Some(key) = env_var("OTEL_INGESTION_KEY") else {
        return Ok(None);
    };
    let mut metadata = opentelemetry_otlp::tonic_types::metadata::MetadataMap::new();
    let value = key
        .parse()
        .map_err(|_| TelemetryError::IngestionKey("not valid ASCII metadata".to_string()))?;
    metadata.insert("signoz-ingestion-key", value);
    Ok(Some(metadata))
}

/// Span name for a request: the matched route template when routing
/// resolved one, otherwise the raw path.
fn span_route(matched: Option<&str>, path: &str) -> String {
    matched.unwrap_or(path).to_string()
}

/// Tower layer that creates an OpenTelemetry span for each HTTP request.
///
/// Captures: method, route, request ID, app id, response status, and
/// the session actor (if present).
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer(TRACER_NAME);
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let route = span_route(
            req.extensions().get::<MatchedPath>().map(MatchedPath::as_str),
            &path,
        );

        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };
        let request_id = header("x-request-id");
        let app_id = header("x-app-id");

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.target", path),
            KeyValue::new("http.route", route.clone()),
            KeyValue::new("http.request_id", request_id),
            KeyValue::new("app.id", app_id),
        ];
        match req.extensions().get::<Session>() {
            Some(session) => {
                attributes.push(KeyValue::new("actor.id", session.actor_id.clone()));
                attributes.push(KeyValue::new("actor.anonymous", session.anonymous));
                attributes.push(KeyValue::new("auth.status", "authenticated"));
            }
            None => attributes.push(KeyValue::new("auth.status", "none")),
        }

        let span = tracer
            .span_builder(format!("{method} {route}"))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}
