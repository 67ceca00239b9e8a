//! Feature-gated tracing hooks for the post-processing stages.
//!
//! With the `tracing` feature the macros forward to the `tracing` crate; without
//! it they expand to nothing so the pipeline carries no logging dependency.

/// Opens an info-level span around one pipeline invocation or stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Records stage counts (anchors decoded, candidates kept, ...).
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::debug!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

/// Reports a rejected input right before the error is returned.
#[cfg(feature = "tracing")]
macro_rules! trace_reject {
    ($err:expr) => {
        tracing::warn!(error = %$err, "rejected input")
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_reject {
    ($err:expr) => {
        let _ = &$err;
    };
}

pub(crate) use trace_event;
pub(crate) use trace_reject;
pub(crate) use trace_span;

/// Stand-in span guard when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Mirrors `tracing::Span::entered`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
