//! Remote parent extraction from `traceparent`/`tracestate` headers.

use opentelemetry::{
    Context, global,
    propagation::{Extractor, TextMapPropagator},
    trace::TraceContextExt as _,
};
use salvo::http::{HeaderMap, HeaderName};

/// The remote parent carried by `headers`, if it names a valid span.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| remote_parent(propagator, headers))
}

fn remote_parent(propagator: &dyn TextMapPropagator, headers: &HeaderMap) -> Option<Context> {
    // Start empty so a request without trace headers doesn't attach to the active span.
    let context = propagator.extract_with_context(&Context::new(), &HeaderCarrier(headers));

    context
        .span()
        .span_context()
        .is_valid()
        .then_some(context)
}

struct HeaderCarrier<'a>(&'a HeaderMap);

impl Extractor for HeaderCarrier<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}
