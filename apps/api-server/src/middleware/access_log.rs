//! Access log middleware - numbers and logs every request.

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Instrument;

/// Header carrying the request's sequence number.
pub static REQUEST_NUMBER_HEADER: &str = "x-request-number";

/// Middleware that counts requests process-wide and logs each one.
///
/// The counter is created once at startup and shared by every worker, so
/// clone one instance into each `App` rather than building a new one.
#[derive(Clone, Default)]
pub struct AccessLog {
    counter: Arc<AtomicU64>,
}

impl AccessLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AccessLogService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService {
            service,
            counter: self.counter.clone(),
        }))
    }
}

pub struct AccessLogService<S> {
    service: S,
    counter: Arc<AtomicU64>,
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_number = self.counter.fetch_add(1, Ordering::Relaxed) + 1;

        let span = tracing::info_span!("access", request_number);
        span.in_scope(|| {
            tracing::info!(
                method = %req.method(),
                uri = %req.uri(),
                "Request #{}",
                request_number
            );
        });

        let fut = self.service.call(req);

        Box::pin(
            async move {
                let mut res = fut.await?;

                tracing::debug!(status = res.status().as_u16(), "Request finished");
                res.headers_mut().insert(
                    HeaderName::from_static(REQUEST_NUMBER_HEADER),
                    HeaderValue::from(request_number),
                );

                Ok(res)
            }
            .instrument(span),
        )
    }
}
