use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::{ConnectInfo, MatchedPath},
    http::{header::USER_AGENT, HeaderMap, HeaderName, Request, Response},
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnBodyChunk, MakeSpan, OnFailure, OnRequest, OnResponse, TraceLayer},
};
use tracing::{debug, field::Empty, info_span, Span};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TracingConfiguration;

const X_FORWARDED_FOR_HEADER: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn setup_tracing(config: &TracingConfiguration) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer()).try_init()?;
    }

    Ok(())
}

pub type MskinTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MskinTracing,
    MskinTracing,
    MskinTracing,
    DefaultOnBodyChunk,
    (),
    MskinTracing,
>;

#[derive(Clone, Copy, Debug, Default)]
pub struct MskinTracing;

impl MskinTracing {
    #[must_use]
    pub fn new_trace_layer() -> MskinTraceLayer {
        TraceLayer::new_for_http()
            .make_span_with(Self)
            .on_request(Self)
            .on_response(Self)
            .on_failure(Self)
            .on_eos(())
    }

    fn extract_header_as_str(headers: &HeaderMap, header: HeaderName) -> Option<String> {
        headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    }
}

impl<B> MakeSpan<B> for MskinTracing {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let user_agent = Self::extract_header_as_str(request.headers(), USER_AGENT)
            .unwrap_or_else(|| "<unknown>".to_string());

        info_span!("HTTP request",
            http.path = Empty,
            http.method = ?request.method(),
            http.version = ?request.version(),
            http.user_agent = user_agent,
            http.client_ip = Empty,
            http.status_code = Empty,

            exception.message = Empty,

            request_id = Empty,
        )
    }
}

impl<B> OnRequest<B> for MskinTracing {
    fn on_request(&mut self, request: &Request<B>, span: &Span) {
        let path = request
            .extensions()
            .get::<MatchedPath>()
            .map_or_else(|| request.uri().path(), MatchedPath::as_str);

        let client_ip = Self::extract_header_as_str(request.headers(), X_FORWARDED_FOR_HEADER)
            .or_else(|| {
                request
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(c)| c.to_string())
            })
            .unwrap_or_else(|| "<unknown>".to_string());

        let request_id = Self::extract_header_as_str(request.headers(), X_REQUEST_ID)
            .unwrap_or_else(|| "<unknown>".to_string());

        span.record("http.path", path);
        span.record("http.client_ip", client_ip.as_str());
        span.record("request_id", request_id.as_str());
    }
}

impl<B> OnResponse<B> for MskinTracing {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        span.record("http.status_code", response.status().as_u16());

        debug!(parent: span, ?latency, "Finished processing request");
    }
}

impl<C: std::fmt::Debug> OnFailure<C> for MskinTracing {
    fn on_failure(&mut self, failure_classification: C, _latency: Duration, span: &Span) {
        span.record(
            "exception.message",
            format!("{failure_classification:?}").as_str(),
        );
    }
}
