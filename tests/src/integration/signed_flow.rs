//! End-to-end submission pipeline over real Ed25519 signatures.

#[cfg(test)]
mod tests {
    use crate::integration::{node, START, WINDOW};
    use ed25519_dalek::{Signer, SigningKey};
    use oracle_runtime::adapters::Ed25519Verifier;
    use qf_01_node_registry::{ActiveRole, NodeMetadata};
    use qf_04_coordinator::{
        submission_hash, ConsensusOutcome, OracleConfig, OracleCoordinator, OracleError,
        RecordingEventSink,
    };
    use rand::rngs::OsRng;
    use shared_types::{FeeBps, ManualClock, NodeId};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct SignedFixture {
        coordinator: OracleCoordinator,
        clock: Arc<ManualClock>,
        keys: HashMap<NodeId, SigningKey>,
    }

    impl SignedFixture {
        /// Coordinator with `count` active nodes, each holding a fresh
        /// Ed25519 keypair registered with the verifier.
        fn new(count: u8, threshold: usize) -> Self {
            let clock = Arc::new(ManualClock::new(START));
            let verifier = Arc::new(Ed25519Verifier::new());
            let config = OracleConfig {
                consensus_threshold: threshold,
                submission_window_secs: WINDOW,
                ..OracleConfig::default()
            };
            let coordinator = OracleCoordinator::new(
                config,
                clock.clone(),
                verifier.clone(),
                Arc::new(RecordingEventSink::new()),
            )
            .expect("valid config");

            let mut keys = HashMap::new();
            for id in 1..=count {
                let signing_key = SigningKey::generate(&mut OsRng);
                let node_id = node(id);
                verifier
                    .register_key(node_id, signing_key.verifying_key().as_bytes())
                    .expect("valid key");
                let metadata = NodeMetadata {
                    public_key: *signing_key.verifying_key().as_bytes(),
                    ..NodeMetadata::default()
                };
                let role = if id == 1 {
                    ActiveRole::Submitter
                } else {
                    ActiveRole::Validator
                };
                coordinator
                    .add_node(node_id, metadata, role)
                    .expect("fresh node");
                keys.insert(node_id, signing_key);
            }
            Self {
                coordinator,
                clock,
                keys,
            }
        }

        fn sign(&self, id: u8, cex: &[FeeBps], dex: &[FeeBps], nonce: u64) -> Vec<u8> {
            let hash = submission_hash(&node(id), cex, dex, nonce);
            self.keys[&node(id)].sign(&hash).to_bytes().to_vec()
        }

        fn submit_signed(
            &self,
            id: u8,
            cex: Vec<FeeBps>,
            dex: Vec<FeeBps>,
            nonce: u64,
        ) -> Result<u64, OracleError> {
            let signature = self.sign(id, &cex, &dex, nonce);
            self.coordinator
                .submit_data(node(id), cex, dex, nonce, signature)
        }
    }

    #[test]
    fn signed_round_finalizes() {
        let f = SignedFixture::new(3, 3);
        for id in 1..=3 {
            f.submit_signed(id, vec![100, 150, 120], vec![30, 25], 1)
                .unwrap();
        }

        let ConsensusOutcome::Finalized(result) = f.coordinator.process_consensus() else {
            panic!("expected finalized round");
        };
        assert_eq!(result.participating_nodes, 3);
        assert_eq!(result.weighted_median_cex_fee, 120);
        assert_eq!(result.weighted_median_dex_fee, 25);
    }

    /// A signature over different data than the submitted payload is
    /// rejected and raises the threat level.
    #[test]
    fn tampered_payload_rejected() {
        let f = SignedFixture::new(3, 3);
        let signature = f.sign(1, &[100, 150, 120], &[30, 25], 1);

        let err = f
            .coordinator
            .submit_data(node(1), vec![1, 1, 1], vec![30, 25], 1, signature)
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::Security(qf_02_security_monitor::SecurityError::InvalidSignature { .. })
        ));
        assert_eq!(f.coordinator.threat_level(), 1);
        assert_eq!(f.coordinator.current_round().submissions, 0);
        // The nonce was never consumed.
        assert_eq!(f.coordinator.next_nonce(&node(1)).unwrap(), 1);
    }

    /// A node cannot sign with another node's key.
    #[test]
    fn cross_node_signature_rejected() {
        let f = SignedFixture::new(3, 3);
        let cex = vec![100, 150, 120];
        let dex = vec![30, 25];

        // Node 2's payload hash, signed with node 1's key.
        let hash = submission_hash(&node(2), &cex, &dex, 1);
        let forged = f.keys[&node(1)].sign(&hash).to_bytes().to_vec();

        let err = f
            .coordinator
            .submit_data(node(2), cex, dex, 1, forged)
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::Security(qf_02_security_monitor::SecurityError::InvalidSignature { .. })
        ));
    }

    /// Re-sending a correctly signed submission is caught by the replay
    /// cache even though the signature itself still verifies.
    #[test]
    fn replayed_signed_submission_rejected() {
        let f = SignedFixture::new(3, 3);
        let cex = vec![100, 150, 120];
        let dex = vec![30, 25];
        let signature = f.sign(1, &cex, &dex, 1);

        f.coordinator
            .submit_data(node(1), cex.clone(), dex.clone(), 1, signature.clone())
            .unwrap();
        let err = f
            .coordinator
            .submit_data(node(1), cex, dex, 1, signature)
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::Security(qf_02_security_monitor::SecurityError::ReplayDetected { .. })
        ));
    }

    /// The payload hash commits to the nonce, so the same fee data under
    /// the next nonce signs to a different hash and is accepted.
    #[test]
    fn nonce_bound_into_payload_hash() {
        let f = SignedFixture::new(3, 3);
        let cex = vec![100, 150, 120];
        let dex = vec![30, 25];

        f.submit_signed(1, cex.clone(), dex.clone(), 1).unwrap();
        assert_ne!(
            submission_hash(&node(1), &cex, &dex, 1),
            submission_hash(&node(1), &cex, &dex, 2)
        );

        // Same fees, fresh nonce, fresh signature: new round entry for a
        // different node would succeed, but the same node is a duplicate in
        // this round.
        let err = f.submit_signed(1, cex.clone(), dex.clone(), 2).unwrap_err();
        assert!(matches!(
            err,
            OracleError::Round(qf_03_round_manager::RoundError::DuplicateSubmission { .. })
        ));
        f.submit_signed(2, cex, dex, 1).unwrap();
    }

    /// A multi-round signed run: every round finalizes and nonces advance.
    #[test]
    fn multi_round_signed_flow() {
        let f = SignedFixture::new(4, 3);

        for nonce in 1..=3u64 {
            for id in 1..=4 {
                let offset = id as u32;
                f.submit_signed(
                    id,
                    vec![100 + offset, 150 + offset, 120 + offset],
                    vec![30 + offset],
                    nonce,
                )
                .unwrap();
            }
            f.clock.advance(10);
            assert!(matches!(
                f.coordinator.process_consensus(),
                ConsensusOutcome::Finalized(_)
            ));
        }
        assert_eq!(f.coordinator.next_nonce(&node(1)).unwrap(), 4);
        assert_eq!(f.coordinator.latest_feed_result().unwrap().round_id, 3);
    }
}
