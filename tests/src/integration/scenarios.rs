//! End-to-end consensus scenarios over the full coordinator stack.

#[cfg(test)]
mod tests {
    use crate::integration::{node, Fixture, START, WINDOW};
    use qf_04_coordinator::{ConsensusOutcome, OracleError};
    use shared_types::OracleEvent;

    /// Scenario A: all six qualifying nodes submit; the round finalizes
    /// with six participants and the deterministic median.
    #[test]
    fn full_participation_finalizes() {
        let f = Fixture::active(6, 6);
        for id in 1..=6 {
            f.submit(id, 1).unwrap();
        }

        let ConsensusOutcome::Finalized(result) = f.coordinator.process_consensus() else {
            panic!("expected finalized round");
        };
        assert_eq!(result.round_id, 1);
        assert_eq!(result.participating_nodes, 6);

        // Per-node CEX medians are 121..=126; the even-count median takes
        // the lower middle value.
        assert_eq!(result.weighted_median_cex_fee, 123);
        assert_eq!(result.weighted_median_dex_fee, 28);

        assert_eq!(
            f.events
                .count_matching(|e| matches!(e, OracleEvent::ConsensusReached { .. })),
            1
        );
        assert_eq!(
            f.events
                .count_matching(|e| matches!(e, OracleEvent::DataSubmitted { .. })),
            6
        );
    }

    /// Scenario B: 3 of 6 nodes submit; past the deadline the round fails
    /// and the next round opens with the id incremented by exactly 1.
    #[test]
    fn partial_participation_fails_and_reopens() {
        let f = Fixture::active(6, 6);
        for id in 1..=3 {
            f.submit(id, 1).unwrap();
        }

        // Still pending inside the window.
        assert_eq!(f.coordinator.process_consensus(), ConsensusOutcome::Pending);

        f.clock.set(START + WINDOW + 1);
        assert_eq!(
            f.coordinator.process_consensus(),
            ConsensusOutcome::Failed {
                round_id: 1,
                submissions: 3
            }
        );

        assert!(f.coordinator.latest_feed_result().is_none());
        assert_eq!(f.coordinator.current_round().round_id, 2);
        assert_eq!(
            f.events
                .count_matching(|e| matches!(e, OracleEvent::ConsensusFailed { .. })),
            1
        );
    }

    /// Scenario C: the same (payload, nonce) twice; the second call is a
    /// replay and the threat level rises by one.
    #[test]
    fn replayed_submission_escalates_threat() {
        let f = Fixture::active(6, 6);
        f.submit(1, 1).unwrap();
        assert_eq!(f.coordinator.threat_level(), 0);

        let err = f.submit(1, 1).unwrap_err();
        assert!(matches!(
            err,
            OracleError::Security(qf_02_security_monitor::SecurityError::ReplayDetected { .. })
        ));
        assert_eq!(f.coordinator.threat_level(), 1);
    }

    /// Scenario D: five escalations pause the system; every node is locked
    /// out until the threat level is reset.
    #[test]
    fn max_threat_level_pauses_until_reset() {
        let f = Fixture::active(6, 6);
        f.submit(1, 1).unwrap();

        for _ in 0..5 {
            let _ = f.submit(1, 1); // replays drive the level up
        }
        assert_eq!(f.coordinator.threat_level(), 5);
        assert!(f.coordinator.is_paused());
        assert!(f.coordinator.is_under_attack());

        for id in 2..=6 {
            let err = f.submit(id, 1).unwrap_err();
            assert!(matches!(err, OracleError::SystemPaused));
        }

        f.coordinator.reset_threat_level();
        assert_eq!(f.coordinator.threat_level(), 0);
        f.submit(2, 1).unwrap();
    }

    /// Emergency unpause also lifts a threat-driven pause.
    #[test]
    fn emergency_unpause_lifts_threat_pause() {
        let f = Fixture::active(6, 6);
        f.submit(1, 1).unwrap();
        for _ in 0..5 {
            let _ = f.submit(1, 1);
        }
        assert!(f.coordinator.is_paused());

        f.coordinator.emergency_unpause();
        assert!(!f.coordinator.is_paused());
        // Invariant: level 5 implies paused, so the level must have dropped.
        assert!(f.coordinator.threat_level() < 5);
        f.submit(2, 1).unwrap();
    }

    /// Idempotence: processing an already-finalized round is a no-op and
    /// never re-emits `ConsensusReached`.
    #[test]
    fn process_consensus_is_idempotent() {
        let f = Fixture::active(3, 3);
        for id in 1..=3 {
            f.submit(id, 1).unwrap();
        }

        assert!(matches!(
            f.coordinator.process_consensus(),
            ConsensusOutcome::Finalized(_)
        ));
        for _ in 0..3 {
            assert_eq!(f.coordinator.process_consensus(), ConsensusOutcome::Pending);
        }
        assert_eq!(
            f.events
                .count_matching(|e| matches!(e, OracleEvent::ConsensusReached { .. })),
            1
        );
    }

    /// Finalized rounds always carry at least the threshold; nonces are
    /// strictly increasing per node across rounds.
    #[test]
    fn multi_round_consensus_properties() {
        let f = Fixture::active(4, 3);
        let mut published = Vec::new();

        for nonce in 1..=5u64 {
            for id in 1..=4 {
                f.submit(id, nonce).unwrap();
            }
            match f.coordinator.process_consensus() {
                ConsensusOutcome::Finalized(result) => published.push(result),
                other => panic!("expected finalized round, got {other:?}"),
            }
        }

        assert_eq!(published.len(), 5);
        for pair in published.windows(2) {
            assert_eq!(pair[1].round_id, pair[0].round_id + 1);
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
        for result in &published {
            assert!(result.participating_nodes >= 3);
        }
        assert_eq!(f.coordinator.next_nonce(&node(1)).unwrap(), 6);
    }

    /// Threshold bounds: 0 and total+1 are always rejected.
    #[test]
    fn threshold_update_bounds() {
        let f = Fixture::active(6, 6);
        assert!(matches!(
            f.coordinator.update_consensus_threshold(0),
            Err(OracleError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            f.coordinator.update_consensus_threshold(7),
            Err(OracleError::InvalidConfiguration(_))
        ));

        // Lowering the threshold lets a partial round finalize.
        f.coordinator.update_consensus_threshold(2).unwrap();
        f.submit(1, 1).unwrap();
        f.submit(2, 1).unwrap();
        assert!(matches!(
            f.coordinator.process_consensus(),
            ConsensusOutcome::Finalized(_)
        ));
    }

    /// The submission window closes exactly after the deadline.
    #[test]
    fn window_boundary() {
        let f = Fixture::active(3, 3);
        assert!(f.coordinator.is_submission_window_open());

        f.clock.set(START + WINDOW);
        f.submit(1, 1).unwrap(); // at the deadline: accepted

        f.clock.set(START + WINDOW + 1);
        assert!(!f.coordinator.is_submission_window_open());
        let err = f.submit(2, 1).unwrap_err();
        assert!(matches!(
            err,
            OracleError::Round(qf_03_round_manager::RoundError::SubmissionWindowClosed { .. })
        ));
    }

    /// Out-of-range fee values never enter a round.
    #[test]
    fn out_of_range_fees_rejected() {
        let f = Fixture::active(3, 3);
        let err = f
            .coordinator
            .submit_data(node(1), vec![10_001], vec![30], 1, vec![1])
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::Round(qf_03_round_manager::RoundError::InvalidDataSubmission { .. })
        ));
        assert_eq!(f.coordinator.current_round().submissions, 0);
    }
}
