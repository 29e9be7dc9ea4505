// self
use crate::obs::{FlowKind, FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"bloodlink_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_flow_outcome_noop_without_recorder() {
		record_flow_outcome(FlowKind::Login, FlowOutcome::Failure);
	}

	#[cfg(feature = "metrics")]
	#[test]
	fn counter_is_labeled_by_flow_and_outcome() {
		// std
		use std::sync::{
			Arc,
			atomic::{AtomicU64, Ordering},
		};
		// crates.io
		use metrics::{
			Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString,
			Unit,
		};

		#[derive(Default)]
		struct Hits(AtomicU64);
		impl CounterFn for Hits {
			fn increment(&self, value: u64) {
				self.0.fetch_add(value, Ordering::Relaxed);
			}

			fn absolute(&self, value: u64) {
				self.0.store(value, Ordering::Relaxed);
			}
		}

		#[derive(Default)]
		struct CapturingRecorder {
			counters: parking_lot::Mutex<Vec<(Key, Arc<Hits>)>>,
		}
		impl Recorder for CapturingRecorder {
			fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
				let hits = Arc::new(Hits::default());

				self.counters.lock().push((key.clone(), hits.clone()));

				Counter::from_arc(hits)
			}

			fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
				Gauge::noop()
			}

			fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
				Histogram::noop()
			}
		}

		let recorder = CapturingRecorder::default();

		metrics::with_local_recorder(&recorder, || {
			record_flow_outcome(FlowKind::Refresh, FlowOutcome::Failure)
		});

		let counters = recorder.counters.lock();
		let (key, hits) = &counters[0];
		let labels: Vec<_> = key.labels().map(|label| (label.key(), label.value())).collect();

		assert_eq!(counters.len(), 1);
		assert_eq!(key.name(), "bloodlink_flow_total");
		assert_eq!(labels, vec![("flow", "refresh"), ("outcome", "failure")]);
		assert_eq!(hits.0.load(Ordering::Relaxed), 1);
	}
}
