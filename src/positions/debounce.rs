//! Trailing-edge debounce bookkeeping, independent of any timer API.
//!
//! The owner pairs each [`Ticket`] with a real timer; when a timer fires it
//! asks whether its ticket is still the current one.

/// Identifies one scheduled run. Rescheduling invalidates older tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug)]
pub struct Debouncer {
	delay_ms: u32,
	issued: u64,
	pending: Option<Ticket>,
}

impl Debouncer {
	pub fn new(delay_ms: u32) -> Self {
		Self {
			delay_ms,
			issued: 0,
			pending: None,
		}
	}

	pub fn delay_ms(&self) -> u32 {
		self.delay_ms
	}

	/// (Re)start the window, replacing anything pending.
	pub fn schedule(&mut self) -> Ticket {
		self.issued += 1;
		let ticket = Ticket(self.issued);
		self.pending = Some(ticket);
		ticket
	}

	/// Drop the pending run. Returns whether there was one.
	pub fn cancel(&mut self) -> bool {
		self.pending.take().is_some()
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Claim the pending run if `ticket` is still current.
	pub fn take_if_current(&mut self, ticket: Ticket) -> bool {
		if self.pending == Some(ticket) {
			self.pending = None;
			true
		} else {
			false
		}
	}
}
