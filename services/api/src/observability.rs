//! Observability wiring for the ordering API.
//!
//! # Purpose
//! Initializes tracing, W3C trace-context propagation, and the Prometheus
//! recorder, and serves the `/metrics` endpoint on its own listener.
//!
//! # Notes
//! Initialization is guarded by `OnceLock` so tests may call it repeatedly.
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_exporter_prometheus::PrometheusHandle;
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static OBS_INIT: OnceLock<()> = OnceLock::new();
static PROPAGATOR_INIT: OnceLock<()> = OnceLock::new();

pub fn init_observability(service_name: &str) -> anyhow::Result<PrometheusHandle> {
    OBS_INIT.get_or_init(|| {
        global::set_text_map_propagator(
            opentelemetry_sdk::propagation::TraceContextPropagator::new(),
        );

        let provider = build_tracer_provider(service_name);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer();
        let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);
        if let Some(provider) = provider {
            let tracer = provider.tracer(service_name.to_string());
            let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
            let _ = registry.with(otel_layer).try_init();
        } else {
            let _ = registry.try_init();
        }
    });

    install_metrics_recorder()
}

fn build_tracer_provider(
    service_name: &str,
) -> Option<opentelemetry_sdk::trace::SdkTracerProvider> {
    let resource = Resource::builder_empty()
        .with_attributes(resource_attributes(service_name))
        .build();
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .ok()?;
    Some(
        opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource)
            .build(),
    )
}

fn resource_attributes(service_name: &str) -> Vec<KeyValue> {
    let mut attrs = vec![KeyValue::new("service.name", service_name.to_string())];
    if let Ok(value) =
        std::env::var("TRATTORIA_SERVICE_INSTANCE_ID").or_else(|_| std::env::var("HOSTNAME"))
    {
        attrs.push(KeyValue::new("service.instance.id", value));
    }
    for (var, key) in [
        ("K8S_NAMESPACE_NAME", "k8s.namespace.name"),
        ("K8S_POD_NAME", "k8s.pod.name"),
        ("DEPLOYMENT_ENVIRONMENT", "deployment.environment"),
    ] {
        if let Ok(value) = std::env::var(var) {
            attrs.push(KeyValue::new(key, value));
        }
    }
    attrs
}

/// Extract the caller's trace context so request spans join upstream traces.
pub fn trace_context_from_headers(headers: &axum::http::HeaderMap) -> opentelemetry::Context {
    PROPAGATOR_INIT.get_or_init(|| {
        global::set_text_map_propagator(
            opentelemetry_sdk::propagation::TraceContextPropagator::new(),
        );
    });
    global::get_text_map_propagator(|prop| prop.extract(&HeaderMapExtractor(headers)))
}

struct HeaderMapExtractor<'a>(&'a axum::http::HeaderMap);

impl Extractor for HeaderMapExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

pub async fn serve_metrics(handle: PrometheusHandle, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "metrics listening");
    serve_metrics_with_listener(handle, listener, std::future::pending()).await
}

async fn serve_metrics_with_listener<F>(
    handle: PrometheusHandle,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    );
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}

fn install_metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("install metrics recorder")?;
    Ok(METRICS_HANDLE.get_or_init(|| handle).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::auth::guard::{require, require_all};
    use crate::auth::keys::signing_keys_from_seed;
    use crate::model::{Dish, Order};
    use crate::store::memory::InMemoryStore;
    use opentelemetry::trace::{TraceContextExt, TraceId};
    use serial_test::serial;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::sync::oneshot;
    use trattoria_authz::{Action, Authorizer, Principal, ResourceKind, Subject};

    fn state() -> AppState {
        AppState {
            api_version: "v1".to_string(),
            store: Arc::new(InMemoryStore::new()),
            authorizer: Arc::new(Authorizer::standard()),
            signing_keys: Arc::new(signing_keys_from_seed([7; 32])),
            token_ttl: Duration::from_secs(60),
            token_leeway_secs: 0,
            default_page_size: 20,
        }
    }

    fn decision_line<'a>(body: &'a str, labels: &[&str]) -> Option<&'a str> {
        body.lines().find(|line| {
            line.starts_with("trattoria_authz_decisions_total{")
                && labels.iter().all(|label| line.contains(label))
        })
    }

    #[test]
    fn resource_attributes_name_the_service() {
        let attrs = resource_attributes("trattoria-api");
        let name = attrs
            .iter()
            .find(|attr| attr.key.as_str() == "service.name")
            .map(|attr| attr.value.to_string());
        assert_eq!(name.as_deref(), Some("trattoria-api"));
    }

    #[test]
    fn trace_context_extracts_span_context() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            "traceparent",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
                .parse()
                .unwrap(),
        );
        let context = trace_context_from_headers(&headers);
        let binding = context.span();
        let span_ctx = binding.span_context();
        assert!(span_ctx.is_valid());
        assert_eq!(
            span_ctx.trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn init_observability_is_idempotent() {
        let handle1 = init_observability("trattoria-api-test").expect("first init");
        let handle2 = init_observability("trattoria-api-test").expect("second init");
        let _ = (handle1.render(), handle2.render());
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn authorization_decisions_are_counted_by_label() {
        let handle = init_observability("trattoria-api-test").expect("init");
        let state = state();
        let guest = Principal::guest();

        assert!(require(&state, &guest, Action::Read, Subject::of::<Dish>()).is_ok());
        assert!(require(&state, &guest, Action::Read, ResourceKind::User).is_err());
        let no_orders: Vec<Order> = Vec::new();
        assert!(require_all(&state, &guest, Action::Read, &no_orders).is_ok());

        let body = handle.render();
        assert!(
            decision_line(&body, &[r#"action="read""#, r#"kind="dish""#, r#"outcome="allow""#])
                .is_some(),
            "{body}"
        );
        assert!(
            decision_line(&body, &[r#"action="read""#, r#"kind="user""#, r#"outcome="deny""#])
                .is_some(),
            "{body}"
        );
        assert!(
            decision_line(&body, &[r#"kind="order""#, r#"outcome="allow""#]).is_some(),
            "{body}"
        );
    }

    async fn wait_for_listen(addr: SocketAddr) -> Result<(), String> {
        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(format!("server never became ready at {addr}"));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn metrics_listener_serves_login_counter() {
        let handle = init_observability("trattoria-api-test").expect("init");
        metrics::counter!("trattoria_logins_total", "outcome" => "success").increment(1);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_metrics_with_listener(handle, listener, async move {
            let _ = shutdown_rx.await;
        }));
        wait_for_listen(addr).await.expect("server ready");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .no_proxy()
            .build()
            .expect("build test client");
        let body = client
            .get(format!("http://{addr}/metrics"))
            .send()
            .await
            .expect("GET /metrics")
            .error_for_status()
            .expect("metrics status")
            .text()
            .await
            .expect("metrics body");
        assert!(body.contains(r#"trattoria_logins_total{outcome="success"}"#));

        let _ = shutdown_tx.send(());
        let _ = tokio::time::timeout(Duration::from_secs(1), server)
            .await
            .expect("server shutdown");
    }
}
