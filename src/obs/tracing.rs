// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by client flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("bloodlink.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning event inside the current flow span.
pub fn warn_flow(kind: FlowKind, message: &'static str, detail: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(flow = kind.as_str(), detail = %detail, "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, message, detail);
	}
}

/// Emits a debug event inside the current flow span.
pub fn debug_flow(kind: FlowKind, message: &'static str, detail: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(flow = kind.as_str(), detail = %detail, "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, message, detail);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_passes_output_through() {
		let span = FlowSpan::new(FlowKind::Refresh, "instrument_passes_output_through");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn events_are_safe_without_subscriber() {
		warn_flow(FlowKind::Refresh, "refresh failed", &"status 400");
		debug_flow(FlowKind::Request, "queued", &3);
	}

	#[cfg(feature = "tracing")]
	#[test]
	fn span_is_named_with_flow_fields() {
		let span = FlowSpan::new(FlowKind::Login, "login");
		let metadata = span.span.metadata().expect("Flow span should carry metadata.");

		assert_eq!(metadata.name(), "bloodlink.flow");
		assert!(metadata.fields().field("flow").is_some());
		assert!(metadata.fields().field("stage").is_some());
	}
}
