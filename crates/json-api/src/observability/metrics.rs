//! Prometheus metrics collection and exposition endpoint.

use std::sync::{Arc, OnceLock};

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    handler,
    http::{StatusCode, header::CONTENT_TYPE},
    prelude::{Depot, Response, StatusError},
};
use tracing::error;

use crate::{extensions::*, state::State};

#[derive(Debug)]
struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    revoked_tokens: IntGauge,
}

static HTTP_METRICS: OnceLock<Option<HttpMetrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Prometheus scrape endpoint. The revoked-token gauge is sampled at scrape time.
#[handler]
pub(crate) async fn metrics_handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return Ok(());
    };

    if let Ok(state) = depot.obtain::<Arc<State>>() {
        let size = state.app.sessions.blacklist_size();

        metrics
            .revoked_tokens
            .set(i64::try_from(size).unwrap_or(i64::MAX));
    }

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    encoder
        .encode(&metrics.registry.gather(), &mut encoded)
        .or_500("failed to encode metrics response")?;

    res.add_header(CONTENT_TYPE, encoder.format_type(), true)
        .or_500("failed to set metrics content type header")?;

    res.render(String::from_utf8_lossy(&encoded).into_owned());

    Ok(())
}

fn metrics() -> Option<&'static HttpMetrics> {
    HTTP_METRICS.get_or_init(build_metrics).as_ref()
}

fn register<M>(registry: &Registry, metric: prometheus::Result<M>, name: &str) -> Option<M>
where
    M: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");

            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");

        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<HttpMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "strm_json_http_requests_total",
                "Total HTTP requests partitioned by method, route and status code.",
            ),
            &["method", "route", "status_code"],
        ),
        "requests_total",
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "strm_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["method", "route"],
        ),
        "request_duration",
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "strm_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )),
        "in_flight",
    )?;

    let revoked_tokens = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "strm_json_revoked_tokens",
            "Revoked credentials held until their natural expiry.",
        )),
        "revoked_tokens",
    )?;

    Some(HttpMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        revoked_tokens,
    })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::{
        Router, Service,
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use strm_app::{
        auth::{SESSION_TTL, SessionClaims},
        domain::users::MockUsersService,
    };

    use crate::test_helpers::{issue_token, state_with_users, test_user};

    use super::{metrics_handler, observe_request};

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_revocation_metrics() -> TestResult {
        observe_request("GET", "/user/info", 200, 0.042);
        observe_request("POST", "/user/logout", 401, 0.003);

        let state = state_with_users(MockUsersService::new());
        let token = issue_token(
            &state,
            &SessionClaims::for_user(&test_user(None), Timestamp::now(), SESSION_TTL),
        )?;

        state.app.sessions.logout(&token);

        let service = Service::new(
            Router::new()
                .hoop(inject(state))
                .push(Router::with_path("metrics").get(metrics_handler)),
        );

        let response = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        assert!(
            response.contains("strm_json_http_requests_total"),
            "expected requests_total metric in response"
        );
        assert!(
            response.contains("strm_json_http_request_duration_seconds"),
            "expected request_duration metric in response"
        );
        assert!(
            response.contains("strm_json_http_requests_in_flight"),
            "expected in-flight metric in response"
        );
        assert!(
            response.contains("strm_json_revoked_tokens 1"),
            "expected revoked token gauge to reflect the registry"
        );

        Ok(())
    }
}
