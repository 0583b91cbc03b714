//! Trace hooks for terminal materializers.
//!
//! Every terminal that drains its whole input reports one event here. The
//! early-exit terminals (`any`, `all`, `first*`, `single`, `element_at`,
//! `contains`) stay silent.
//!
//! Compiled to a no-op unless the `tracing` feature is enabled; subscribers are
//! installed by the application, never here.

pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    #[cfg(test)]
    recorded::push(event);

    #[cfg(feature = "tracing")]
    {
        let span = tracing::trace_span!("seqlinq", event);
        let _entered = span.enter();
        for (k, v) in key_values {
            tracing::trace!(%event, %k, %v, "terminal");
        }
    }

    let _ = (event, key_values);
}
