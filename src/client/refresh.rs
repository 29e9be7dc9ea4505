//! Single-flight gate shared by every request that meets a 401.
//!
//! The first request to arrive while the gate is idle becomes the leader and runs the refresh.
//! Requests arriving while it runs queue a waiter and suspend. Settling the gate clears the
//! active flag and releases every waiter in FIFO order under the same lock acquisition, so a
//! waiter is released exactly once and no request can join a refresh that already settled.

// crates.io
use tokio::sync::oneshot;
// self
use crate::_prelude::*;

/// Result of a refresh as seen by the requests waiting on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
	/// A new access token is available; replay the original request.
	Refreshed,
	/// Recovery failed; surface the original 401.
	Failed,
}

#[derive(Debug, Default)]
struct GateState {
	active: bool,
	pending: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

#[derive(Debug, Default)]
pub(crate) struct RefreshGate(Mutex<GateState>);
impl RefreshGate {
	/// Joins the in-flight refresh, or starts one when the gate is idle.
	pub(crate) fn join(&self) -> Ticket<'_> {
		let mut state = self.0.lock();

		if state.active {
			let (sender, receiver) = oneshot::channel();

			state.pending.push_back(sender);

			Ticket::Waiter(receiver)
		} else {
			state.active = true;

			Ticket::Leader(RefreshLease { gate: self, settled: false })
		}
	}

	pub(crate) fn is_active(&self) -> bool {
		self.0.lock().active
	}

	pub(crate) fn pending_len(&self) -> usize {
		self.0.lock().pending.len()
	}

	fn settle(&self, outcome: RefreshOutcome) -> usize {
		let drained = {
			let mut state = self.0.lock();

			state.active = false;

			std::mem::take(&mut state.pending)
		};
		let released = drained.len();

		for waiter in drained {
			// A waiter whose request was dropped no longer needs the outcome.
			let _ = waiter.send(outcome);
		}

		released
	}
}

/// Role assigned by [`RefreshGate::join`].
pub(crate) enum Ticket<'a> {
	/// Run the refresh and settle the gate.
	Leader(RefreshLease<'a>),
	/// Wait for the leader's outcome.
	Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// Leadership over the in-flight refresh.
///
/// Dropping an unsettled lease (the leading request was cancelled mid-refresh) settles the gate
/// as [`RefreshOutcome::Failed`] so queued requests never hang.
pub(crate) struct RefreshLease<'a> {
	gate: &'a RefreshGate,
	settled: bool,
}
impl RefreshLease<'_> {
	/// Publishes the outcome to every waiter and returns how many were released.
	pub(crate) fn settle(mut self, outcome: RefreshOutcome) -> usize {
		self.settled = true;

		self.gate.settle(outcome)
	}
}
impl Drop for RefreshLease<'_> {
	fn drop(&mut self) {
		if !self.settled {
			self.gate.settle(RefreshOutcome::Failed);
		}
	}
}
