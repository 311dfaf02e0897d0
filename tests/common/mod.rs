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

//! In-memory contract client shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use smol::Timer;

use ecosphere::{
    client::{DaoClient, DaoClientPtr},
    error::ReadTarget,
    model::{Confirmation, PendingWrite, Proposal, WriteAction},
    Eco, Error, Result,
};

pub const CHAIN_ID: u64 = 31337;

/// Terminal logging for a test run. Safe to call from several tests.
pub fn init_logger() {
    let mut cfg = simplelog::ConfigBuilder::new();
    cfg.add_filter_ignore("ecosphere::token".to_string());

    // We check this error so we can execute same file tests in parallel,
    // otherwise second one fails to init logger here.
    if simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        cfg.build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .is_err()
    {
        log::debug!(target: "test", "Logger already initialized");
    }
}

/// One ECO in base units
pub fn eco(amount: u64) -> U256 {
    U256::from(amount) * U256::exp10(18)
}

pub fn account() -> Address {
    Address::from_low_u64_be(0xec0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Submit(String),
    Vote(u64),
    Execute(u64),
    Mint { credit_id: u64, amount: U256, value: U256 },
    Burn { credit_id: u64, amount: U256 },
    Transfer { to: Address, amount: U256, destination_chain_id: u64 },
    Verify(u64),
}

/// How a sent transaction fails to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmFailure {
    Reverted,
    Dropped,
}

pub struct MockState {
    pub chain_id: u64,
    pub block: u64,
    pub proposals: Vec<Proposal>,
    pub quorum_percentage: U256,
    pub total_supply: U256,
    pub eco_balance: U256,
    pub credits: HashMap<u64, U256>,
    /// Every read fails while set
    pub fail_reads: bool,
    /// Sends are rejected with this revert reason while set
    pub revert_reason: Option<String>,
    /// Confirmations fail this way while set
    pub confirm_failure: Option<ConfirmFailure>,
    /// Proposal count reported instead of the real one while set
    pub reported_count: Option<u64>,
    /// Delays applied to successive `proposal_count` calls
    pub count_delays: VecDeque<Duration>,
    pub count_calls: usize,
    pub writes: Vec<WriteCall>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID,
            block: 1,
            proposals: vec![],
            quorum_percentage: U256::from(4u8),
            total_supply: eco(1_000_000),
            eco_balance: eco(50_000),
            credits: HashMap::new(),
            fail_reads: false,
            revert_reason: None,
            confirm_failure: None,
            reported_count: None,
            count_delays: VecDeque::new(),
            count_calls: 0,
            writes: vec![],
        }
    }
}

#[derive(Default)]
pub struct MockClient {
    state: Mutex<MockState>,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn push_proposal(&self, description: &str, votes: U256, executed: bool) {
        let mut state = self.state();
        let id = state.proposals.len() as u64;
        state.proposals.push(Proposal {
            id,
            description: description.to_string(),
            proposer: Address::from_low_u64_be(id + 100),
            vote_count: votes,
            executed,
        });
    }

    fn read_guard(&self, target: ReadTarget) -> Result<MutexGuard<'_, MockState>> {
        let state = self.state();
        if state.fail_reads {
            return Err(Error::read(target, "connection refused"))
        }
        Ok(state)
    }

    fn write(&self, action: WriteAction, call: WriteCall) -> Result<PendingWrite> {
        let mut state = self.state();
        if let Some(reason) = &state.revert_reason {
            return Err(Error::from_write_failure(action, reason.clone()))
        }

        let tx_hash = TxHash::from_low_u64_be(state.writes.len() as u64 + 1);
        match &call {
            WriteCall::Submit(description) => {
                let id = state.proposals.len() as u64;
                state.proposals.push(Proposal {
                    id,
                    description: description.clone(),
                    proposer: account(),
                    vote_count: U256::zero(),
                    executed: false,
                });
            }
            WriteCall::Vote(id) => {
                let weight = state.eco_balance;
                state.proposals[*id as usize].vote_count += weight;
            }
            WriteCall::Execute(id) => state.proposals[*id as usize].executed = true,
            WriteCall::Mint { credit_id, amount, .. } => {
                *state.credits.entry(*credit_id).or_default() += *amount;
            }
            WriteCall::Burn { credit_id, amount } => {
                *state.credits.entry(*credit_id).or_default() -= *amount;
            }
            WriteCall::Transfer { amount, .. } => state.eco_balance -= *amount,
            WriteCall::Verify(_) => {}
        }
        state.writes.push(call);

        Ok(PendingWrite { action, tx_hash })
    }
}

#[async_trait]
impl DaoClient for MockClient {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.state().chain_id)
    }

    async fn account(&self) -> Result<Address> {
        Ok(account())
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.read_guard(ReadTarget::Network)?.block)
    }

    async fn proposal_count(&self) -> Result<u64> {
        let delay = {
            let mut state = self.state();
            state.count_calls += 1;
            state.count_delays.pop_front()
        };

        if let Some(delay) = delay {
            Timer::after(delay).await;
        }

        let state = self.read_guard(ReadTarget::Proposals)?;
        Ok(state.reported_count.unwrap_or(state.proposals.len() as u64))
    }

    async fn get_proposal(&self, index: u64) -> Result<Proposal> {
        let state = self.read_guard(ReadTarget::Proposals)?;
        match state.proposals.get(index as usize) {
            Some(p) => Ok(p.clone()),
            None => Err(Error::read(ReadTarget::Proposals, "execution reverted")),
        }
    }

    async fn quorum_percentage(&self) -> Result<U256> {
        Ok(self.read_guard(ReadTarget::Quorum)?.quorum_percentage)
    }

    async fn submit_proposal(&self, description: &str) -> Result<PendingWrite> {
        self.write(WriteAction::SubmitProposal, WriteCall::Submit(description.to_string()))
    }

    async fn vote(&self, proposal_id: u64) -> Result<PendingWrite> {
        self.write(WriteAction::Vote, WriteCall::Vote(proposal_id))
    }

    async fn execute_proposal(&self, proposal_id: u64) -> Result<PendingWrite> {
        self.write(WriteAction::Execute, WriteCall::Execute(proposal_id))
    }

    async fn total_supply(&self) -> Result<U256> {
        Ok(self.read_guard(ReadTarget::Quorum)?.total_supply)
    }

    async fn token_balance(&self, _owner: Address) -> Result<U256> {
        Ok(self.read_guard(ReadTarget::Balances)?.eco_balance)
    }

    async fn cross_chain_transfer(
        &self,
        to: Address,
        amount: U256,
        destination_chain_id: u64,
    ) -> Result<PendingWrite> {
        self.write(WriteAction::Transfer, WriteCall::Transfer { to, amount, destination_chain_id })
    }

    async fn verify_project(&self, project_id: u64) -> Result<PendingWrite> {
        self.write(WriteAction::VerifyProject, WriteCall::Verify(project_id))
    }

    async fn credit_balance(&self, _owner: Address, credit_id: u64) -> Result<U256> {
        let state = self.read_guard(ReadTarget::Balances)?;
        Ok(state.credits.get(&credit_id).copied().unwrap_or_default())
    }

    async fn mint_credits(
        &self,
        credit_id: u64,
        amount: U256,
        value: U256,
    ) -> Result<PendingWrite> {
        self.write(WriteAction::BuyCredits, WriteCall::Mint { credit_id, amount, value })
    }

    async fn burn_credits(&self, credit_id: u64, amount: U256) -> Result<PendingWrite> {
        self.write(WriteAction::SellCredits, WriteCall::Burn { credit_id, amount })
    }

    async fn confirm(&self, pending: PendingWrite) -> Result<Confirmation> {
        let mut state = self.state();
        let tx_hash = format!("{:#x}", pending.tx_hash);
        match state.confirm_failure {
            Some(ConfirmFailure::Reverted) => {
                state.block += 1;
                return Err(Error::WriteReverted { action: pending.action, tx_hash })
            }
            Some(ConfirmFailure::Dropped) => {
                return Err(Error::WriteUnconfirmed { action: pending.action, tx_hash })
            }
            None => {}
        }

        state.block += 1;
        Ok(Confirmation {
            action: pending.action,
            tx_hash: pending.tx_hash,
            block_number: Some(state.block),
        })
    }
}

/// Connect a session to `mock`.
pub async fn session(mock: &Arc<MockClient>) -> Eco {
    let client: DaoClientPtr = mock.clone();
    Eco::connect(client, CHAIN_ID).await.unwrap()
}
