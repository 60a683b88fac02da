use super::ConnectionStatus;

/// A probe in flight. Carries the endpoint identity it was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProbeTicket {
    pub endpoint: String,
    epoch: u64,
    seq: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ProbeStart {
    /// No endpoint configured; report disconnected without a request.
    Skip,
    Run(ProbeTicket),
}

/// Decides which probe results are allowed to update the status.
///
/// - Every `set_endpoint` starts a new epoch; results from older epochs are
///   dropped even if the URL string happens to match.
/// - Within an epoch, a result older than the last applied one is dropped.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProbeTracker {
    endpoint: String,
    epoch: u64,
    next_seq: u64,
    applied_seq: Option<u64>,
}

impl ProbeTracker {
    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = endpoint.to_string();
        self.epoch += 1;
        self.applied_seq = None;
    }

    pub fn begin(&mut self) -> ProbeStart {
        if self.endpoint.is_empty() {
            return ProbeStart::Skip;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        ProbeStart::Run(ProbeTicket {
            endpoint: self.endpoint.clone(),
            epoch: self.epoch,
            seq,
        })
    }

    /// Returns the status to show, or `None` when the result is stale.
    pub fn complete(&mut self, ticket: &ProbeTicket, reachable: bool) -> Option<ConnectionStatus> {
        if ticket.epoch != self.epoch || ticket.endpoint != self.endpoint {
            return None;
        }
        if matches!(self.applied_seq, Some(applied) if ticket.seq < applied) {
            return None;
        }
        self.applied_seq = Some(ticket.seq);
        Some(ConnectionStatus::from_reachable(reachable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tracker: &mut ProbeTracker) -> ProbeTicket {
        match tracker.begin() {
            ProbeStart::Run(t) => t,
            ProbeStart::Skip => panic!("expected a probe to start"),
        }
    }

    #[test]
    fn test_empty_endpoint_never_probes() {
        let mut tracker = ProbeTracker::default();
        assert_eq!(tracker.begin(), ProbeStart::Skip);

        tracker.set_endpoint("");
        assert_eq!(tracker.begin(), ProbeStart::Skip);
    }

    #[test]
    fn test_result_for_current_endpoint_applies() {
        let mut tracker = ProbeTracker::default();
        tracker.set_endpoint("https://a.example");
        let t = run(&mut tracker);
        assert_eq!(t.endpoint, "https://a.example");
        assert_eq!(tracker.complete(&t, true), Some(ConnectionStatus::Connected));
    }

    #[test]
    fn test_two_edits_before_resolution_only_second_wins() {
        let mut tracker = ProbeTracker::default();

        tracker.set_endpoint("https://a.example");
        let first = run(&mut tracker);
        tracker.set_endpoint("https://b.example");
        let second = run(&mut tracker);

        // Second resolves first, then the stale one arrives.
        assert_eq!(
            tracker.complete(&second, false),
            Some(ConnectionStatus::Disconnected)
        );
        assert_eq!(tracker.complete(&first, true), None);

        // Opposite resolution order gives the same outcome.
        let mut tracker = ProbeTracker::default();
        tracker.set_endpoint("https://a.example");
        let first = run(&mut tracker);
        tracker.set_endpoint("https://b.example");
        let second = run(&mut tracker);
        assert_eq!(tracker.complete(&first, true), None);
        assert_eq!(
            tracker.complete(&second, false),
            Some(ConnectionStatus::Disconnected)
        );
    }

    #[test]
    fn test_reset_to_same_url_still_discards_old_epoch() {
        let mut tracker = ProbeTracker::default();
        tracker.set_endpoint("https://a.example");
        let old = run(&mut tracker);
        tracker.set_endpoint("https://b.example");
        tracker.set_endpoint("https://a.example");
        let fresh = run(&mut tracker);

        assert_eq!(tracker.complete(&old, false), None);
        assert_eq!(tracker.complete(&fresh, true), Some(ConnectionStatus::Connected));
    }

    #[test]
    fn test_out_of_order_result_within_endpoint_is_dropped() {
        let mut tracker = ProbeTracker::default();
        tracker.set_endpoint("https://a.example");
        let tick1 = run(&mut tracker);
        let tick2 = run(&mut tracker);

        assert_eq!(tracker.complete(&tick2, true), Some(ConnectionStatus::Connected));
        assert_eq!(tracker.complete(&tick1, false), None);
    }
}
