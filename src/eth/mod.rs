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

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use ethers::{
    contract::{ContractCall, ContractError},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, U256, U64},
};
use log::{debug, info};
use url::Url;

use crate::{
    client::{DaoClient, DaoClientPtr},
    error::ReadTarget,
    model::{Confirmation, PendingWrite, Proposal, WriteAction},
    Error, Result,
};

/// Generated contract bindings
pub mod bindings;
use bindings::{DaoGovernance, EcoToken, EsgCredits};

/// Deployed contract addresses the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub token: Address,
    pub dao: Address,
    pub credits: Address,
}

impl ContractAddresses {
    pub fn parse(token: &str, dao: &str, credits: &str) -> Result<Self> {
        Ok(Self { token: parse_address(token)?, dao: parse_address(dao)?, credits: parse_address(credits)? })
    }
}

/// Parse a hex-encoded account or contract address.
pub fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s.trim()).map_err(|_| Error::InvalidAddress(s.to_string()))
}

/// `DaoClient` backed by an `ethers` middleware stack.
pub struct EthClient<M: Middleware> {
    client: Arc<M>,
    account: Address,
    token: EcoToken<M>,
    dao: DaoGovernance<M>,
    credits: EsgCredits<M>,
}

impl<M: Middleware + 'static> EthClient<M> {
    pub fn new(client: Arc<M>, account: Address, addresses: &ContractAddresses) -> Self {
        Self {
            token: EcoToken::new(addresses.token, client.clone()),
            dao: DaoGovernance::new(addresses.dao, client.clone()),
            credits: EsgCredits::new(addresses.credits, client.clone()),
            client,
            account,
        }
    }

    /// Send a state-changing call and return its pending handle.
    async fn send(&self, action: WriteAction, call: ContractCall<M, ()>) -> Result<PendingWrite> {
        debug!(target: "ecosphere::eth", "Sending {action} transaction from {:#x}", self.account);
        let pending = match call.send().await {
            Ok(p) => p,
            Err(e) => return Err(write_error(action, e)),
        };
        let tx_hash = *pending;
        info!(target: "ecosphere::eth", "Submitted {action} transaction {tx_hash:#x}");
        Ok(PendingWrite { action, tx_hash })
    }
}

/// Extract the revert reason of a failed send, if the node returned one.
fn write_error<M: Middleware>(action: WriteAction, err: ContractError<M>) -> Error {
    let reason = match err.decode_revert::<String>() {
        Some(reason) => reason,
        None => err.to_string(),
    };
    Error::from_write_failure(action, reason)
}

fn to_u64(v: U256, target: ReadTarget, what: &str) -> Result<u64> {
    u64::try_from(v).map_err(|_| Error::read(target, format!("{what} does not fit in 64 bits")))
}

#[async_trait]
impl<M: Middleware + 'static> DaoClient for EthClient<M> {
    async fn chain_id(&self) -> Result<u64> {
        let chain_id = self
            .client
            .get_chainid()
            .await
            .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;
        to_u64(chain_id, ReadTarget::Network, "chain ID")
    }

    async fn account(&self) -> Result<Address> {
        Ok(self.account)
    }

    async fn block_number(&self) -> Result<u64> {
        let height = self
            .client
            .get_block_number()
            .await
            .map_err(|e| Error::read(ReadTarget::Network, e))?;
        Ok(height.as_u64())
    }

    async fn proposal_count(&self) -> Result<u64> {
        let count = self
            .dao
            .proposal_count()
            .call()
            .await
            .map_err(|e| Error::read(ReadTarget::Proposals, e))?;
        to_u64(count, ReadTarget::Proposals, "proposal count")
    }

    async fn get_proposal(&self, index: u64) -> Result<Proposal> {
        let (description, proposer, vote_count, executed) = self
            .dao
            .get_proposal(U256::from(index))
            .call()
            .await
            .map_err(|e| Error::read(ReadTarget::Proposals, e))?;

        Ok(Proposal { id: index, description, proposer, vote_count, executed })
    }

    async fn quorum_percentage(&self) -> Result<U256> {
        self.dao.quorum_percentage().call().await.map_err(|e| Error::read(ReadTarget::Quorum, e))
    }

    async fn submit_proposal(&self, description: &str) -> Result<PendingWrite> {
        let call = self.dao.submit_proposal(description.to_string());
        self.send(WriteAction::SubmitProposal, call).await
    }

    async fn vote(&self, proposal_id: u64) -> Result<PendingWrite> {
        let call = self.dao.vote(U256::from(proposal_id));
        self.send(WriteAction::Vote, call).await
    }

    async fn execute_proposal(&self, proposal_id: u64) -> Result<PendingWrite> {
        let call = self.dao.execute_proposal(U256::from(proposal_id));
        self.send(WriteAction::Execute, call).await
    }

    async fn total_supply(&self) -> Result<U256> {
        self.token.total_supply().call().await.map_err(|e| Error::read(ReadTarget::Quorum, e))
    }

    async fn token_balance(&self, owner: Address) -> Result<U256> {
        self.token.balance_of(owner).call().await.map_err(|e| Error::read(ReadTarget::Balances, e))
    }

    async fn cross_chain_transfer(
        &self,
        to: Address,
        amount: U256,
        destination_chain_id: u64,
    ) -> Result<PendingWrite> {
        let call =
            self.token.initiate_cross_chain_transfer(to, amount, U256::from(destination_chain_id));
        self.send(WriteAction::Transfer, call).await
    }

    async fn verify_project(&self, project_id: u64) -> Result<PendingWrite> {
        let call = self.token.verify_project(U256::from(project_id));
        self.send(WriteAction::VerifyProject, call).await
    }

    async fn credit_balance(&self, owner: Address, credit_id: u64) -> Result<U256> {
        self.credits
            .balance_of(owner, U256::from(credit_id))
            .call()
            .await
            .map_err(|e| Error::read(ReadTarget::Balances, e))
    }

    async fn mint_credits(
        &self,
        credit_id: u64,
        amount: U256,
        value: U256,
    ) -> Result<PendingWrite> {
        let call = self.credits.mint(U256::from(credit_id), amount, Bytes::new()).value(value);
        self.send(WriteAction::BuyCredits, call).await
    }

    async fn burn_credits(&self, credit_id: u64, amount: U256) -> Result<PendingWrite> {
        let call = self.credits.burn(U256::from(credit_id), amount, Bytes::new());
        self.send(WriteAction::SellCredits, call).await
    }

    async fn confirm(&self, pending: PendingWrite) -> Result<Confirmation> {
        let PendingWrite { action, tx_hash } = pending;
        debug!(target: "ecosphere::eth", "Waiting for {action} transaction {tx_hash:#x}");

        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .await
            .map_err(|e| Error::from_write_failure(action, e.to_string()))?;

        let Some(receipt) = receipt else {
            return Err(Error::WriteUnconfirmed { action, tx_hash: format!("{tx_hash:#x}") })
        };

        if receipt.status != Some(U64::from(1)) {
            return Err(Error::WriteReverted { action, tx_hash: format!("{tx_hash:#x}") })
        }

        let block_number = receipt.block_number.map(|n| n.as_u64());
        info!(target: "ecosphere::eth", "Transaction {tx_hash:#x} mined in block {block_number:?}");
        Ok(Confirmation { action, tx_hash, block_number })
    }
}

/// Connection parameters for [`connect`].
#[derive(Debug, Clone)]
pub struct EthSettings {
    pub endpoint: Url,
    pub contracts: ContractAddresses,
    /// Hex-encoded key to sign with. Node-managed accounts are used when unset.
    pub private_key: Option<String>,
}

/// Build an HTTP-backed client.
///
/// With a private key, transactions are signed locally. Without one, the
/// first account the node manages becomes the default sender, which is how
/// Anvil and Hardhat dev nodes expose their funded accounts.
pub async fn connect(settings: &EthSettings) -> Result<DaoClientPtr> {
    info!(target: "ecosphere::eth", "Connecting to Ethereum node at {}", settings.endpoint);
    let provider = Provider::<Http>::try_from(settings.endpoint.as_str())
        .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;

    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;
    let chain_id = to_u64(chain_id, ReadTarget::Network, "chain ID")?;

    if let Some(key) = settings.private_key.as_deref().filter(|k| !k.is_empty()) {
        let key = key.trim().trim_start_matches("0x");
        let wallet = LocalWallet::from_str(key)
            .map_err(|e| Error::InvalidSigningKey(e.to_string()))?
            .with_chain_id(chain_id);
        let account = wallet.address();
        info!(target: "ecosphere::eth", "Signing locally as {account:#x}");

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        return Ok(Arc::new(EthClient::new(client, account, &settings.contracts)))
    }

    let accounts =
        provider.get_accounts().await.map_err(|e| Error::ProviderUnavailable(e.to_string()))?;
    let Some(account) = accounts.first().copied() else { return Err(Error::NoAccount) };
    info!(target: "ecosphere::eth", "Using node-managed account {account:#x}");

    let client = Arc::new(provider.with_sender(account));
    Ok(Arc::new(EthClient::new(client, account, &settings.contracts)))
}
