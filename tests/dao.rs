/* This file is part of EcoSphere DAO
 *
 * Copyright (C) 2024-2026 EcoSphere DAO contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::time::Duration;

use ethers::types::U256;

use ecosphere::{Error, ErrorClass};

mod common;
use common::{eco, init_logger, session, ConfirmFailure, MockClient, WriteCall};

// Quorum in these tests: 4% of 1,000,000 ECO = 40,000 ECO

#[test]
fn refresh_projects_against_threshold() {
    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(10_000), false);
        mock.push_proposal("Plant trees", eco(40_000), false);
        mock.push_proposal("Retire coal credits", eco(90_000), true);
        let eco_session = session(&mock).await;

        assert!(eco_session.proposals().await.is_empty());
        let proposals = eco_session.refresh_proposals().await.unwrap();

        assert_eq!(proposals.len(), 3);
        assert_eq!(proposals.iter().map(|p| p.id).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(!proposals[0].quorum_reached && proposals[0].actionable);
        assert!(proposals[1].quorum_reached && proposals[1].can_execute());
        assert!(proposals[2].quorum_reached && !proposals[2].actionable);
        assert_eq!(eco_session.proposals().await, proposals);
    });
}

#[test]
fn failed_refresh_keeps_previous_list() {
    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(10_000), false);
        let eco_session = session(&mock).await;
        let before = eco_session.refresh_proposals().await.unwrap();

        mock.push_proposal("Plant trees", eco(0), false);
        mock.state().fail_reads = true;

        let err = eco_session.refresh_proposals().await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Read);
        assert_eq!(err.user_message(), "Failed to load proposals. Please try again later.");
        assert_eq!(eco_session.proposals().await, before);
    });
}

#[test]
fn concurrent_refreshes_last_completion_wins() {
    init_logger();

    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(10_000), false);
        let eco_session = session(&mock).await;

        // The first refresh stalls before reading the count
        mock.state().count_delays.push_back(Duration::from_millis(100));

        let slow = eco_session.refresh_proposals();
        let fast = async {
            let proposals = eco_session.refresh_proposals().await;
            mock.push_proposal("Plant trees", eco(0), false);
            proposals
        };

        let (slow, fast) = smol::future::zip(slow, fast).await;
        assert_eq!(fast.unwrap().len(), 1);
        assert_eq!(slow.unwrap().len(), 2);

        assert_eq!(mock.state().count_calls, 2);
        assert_eq!(eco_session.proposals().await.len(), 2);
    });
}

#[test]
fn vote_then_execute() {
    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(0), false);
        let eco_session = session(&mock).await;

        // Not in the snapshot yet, so the lookup refreshes first
        let confirmation = eco_session.vote(0).await.unwrap();
        assert_eq!(confirmation.block_number, Some(2));

        // The post-write refresh picked up the new tally
        let proposals = eco_session.proposals().await;
        assert_eq!(proposals[0].vote_count, eco(50_000));
        assert!(proposals[0].can_execute());

        eco_session.execute(0).await.unwrap();
        assert!(!eco_session.proposals().await[0].actionable);
        assert_eq!(mock.state().writes, vec![WriteCall::Vote(0), WriteCall::Execute(0)]);
    });
}

#[test]
fn refusals_never_reach_the_write_path() {
    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Below quorum", eco(39_999), false);
        mock.push_proposal("Already executed", eco(60_000), true);
        let eco_session = session(&mock).await;

        assert!(matches!(eco_session.execute(0).await, Err(Error::QuorumNotReached(0))));
        assert!(matches!(eco_session.vote(1).await, Err(Error::ProposalExecuted(1))));
        assert!(matches!(eco_session.execute(1).await, Err(Error::ProposalExecuted(1))));
        assert!(matches!(eco_session.vote(7).await, Err(Error::ProposalNotFound(7))));

        assert!(mock.state().writes.is_empty());
    });
}

#[test]
fn submit_proposal() {
    smol::block_on(async {
        let mock = MockClient::new();
        let eco_session = session(&mock).await;

        assert!(matches!(
            eco_session.submit_proposal("   ").await,
            Err(Error::EmptyDescription)
        ));
        assert!(mock.state().writes.is_empty());

        eco_session.submit_proposal("  Build a wind farm ").await.unwrap();
        let proposals = eco_session.proposals().await;
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].description, "Build a wind farm");
        assert_eq!(proposals[0].vote_count, U256::zero());
    });
}

#[test]
fn unauthorized_revert_is_reported_as_such() {
    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(60_000), false);
        let eco_session = session(&mock).await;
        mock.state().revert_reason =
            Some(String::from("execution reverted: Ownable: caller is not the owner"));

        let err = eco_session.execute(0).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert_eq!(err.user_message(), "You are not authorized to perform this action.");

        mock.state().revert_reason = Some(String::from("execution reverted: Already voted"));
        let err = eco_session.vote(0).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Write);
        assert_eq!(err.user_message(), "Failed to cast vote. Run with -v for details.");
    });
}

#[test]
fn write_succeeds_even_if_refresh_fails() {
    init_logger();

    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(0), false);
        let eco_session = session(&mock).await;
        let before = eco_session.refresh_proposals().await.unwrap();

        // Reads fail from here on, but the vote itself goes through
        mock.state().fail_reads = true;
        eco_session.vote(0).await.unwrap();

        assert_eq!(eco_session.proposals().await, before);
        assert_eq!(mock.state().writes, vec![WriteCall::Vote(0)]);
    });
}

#[test]
fn oversized_count_is_a_read_error() {
    smol::block_on(async {
        let mock = MockClient::new();
        let eco_session = session(&mock).await;
        mock.state().reported_count = Some(1 << 60);

        let err = eco_session.refresh_proposals().await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Read);
        assert!(eco_session.proposals().await.is_empty());
    });
}

#[test]
fn execute_rechecks_quorum_before_refusing() {
    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(10_000), false);
        let eco_session = session(&mock).await;
        eco_session.refresh_proposals().await.unwrap();

        // Votes land on-chain after the stored list was fetched
        mock.state().proposals[0].vote_count = eco(45_000);

        eco_session.execute(0).await.unwrap();
        assert_eq!(mock.state().writes, vec![WriteCall::Execute(0)]);
        assert!(!eco_session.proposals().await[0].actionable);
    });
}

#[test]
fn failed_confirmation_keeps_stored_list() {
    smol::block_on(async {
        let mock = MockClient::new();
        mock.push_proposal("Fund solar panels", eco(0), false);
        let eco_session = session(&mock).await;
        let before = eco_session.refresh_proposals().await.unwrap();

        mock.state().confirm_failure = Some(ConfirmFailure::Reverted);
        let err = eco_session.vote(0).await.unwrap_err();
        assert!(matches!(err, Error::WriteReverted { .. }));
        assert_eq!(err.class(), ErrorClass::Write);
        assert_eq!(err.user_message(), "Failed to cast vote. Run with -v for details.");
        assert_eq!(eco_session.proposals().await, before);

        mock.state().confirm_failure = Some(ConfirmFailure::Dropped);
        let err = eco_session.submit_proposal("Plant trees").await.unwrap_err();
        assert!(matches!(err, Error::WriteUnconfirmed { .. }));
        assert_eq!(err.user_message(), "Failed to submit proposal. Run with -v for details.");
        assert_eq!(eco_session.proposals().await, before);
    });
}
