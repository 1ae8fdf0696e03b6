//! Request middleware. Wrap order, outermost first:
//! CORS, `RequestTrace`, `StructuredLogger`, `TraceSpan`.

pub mod cors;
pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;

/// Trace id stored in request extensions by [`RequestTrace`].
#[derive(Debug, Clone)]
pub struct TraceId(pub String);
