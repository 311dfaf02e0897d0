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

use log::{debug, info, warn};
use smol::Timer;

use crate::{cli_util::prettytable_proposals, Eco, Error, ErrorClass, Result};

/// Tracks the last block seen by [`watch`].
#[derive(Debug, Default)]
pub struct BlockWatcher {
    last_block: Option<u64>,
}

impl BlockWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_block(&self) -> Option<u64> {
        self.last_block
    }

    /// Poll the node once. Returns `true` when a new block was seen and the
    /// quorum threshold and proposal list were reloaded.
    ///
    /// A chain ID change is a connectivity error. Failed reloads are left
    /// for the caller to report, and are retried on the next block.
    pub async fn tick(&mut self, eco: &Eco) -> Result<bool> {
        let chain_id = eco.client.chain_id().await?;
        if chain_id != eco.chain_id {
            return Err(Error::WrongNetwork { expected: eco.chain_id, actual: chain_id })
        }

        let height = eco.client.block_number().await?;
        if self.last_block == Some(height) {
            return Ok(false)
        }
        debug!(target: "ecosphere::watch", "New block {height}");

        eco.refresh_quorum().await?;
        eco.refresh_proposals().await?;
        self.last_block = Some(height);

        Ok(true)
    }
}

/// Reprint the proposal table on every new block until a connectivity
/// error occurs.
pub async fn watch(eco: &Eco, interval: Duration) -> Result<()> {
    info!(target: "ecosphere::watch", "Watching for new blocks every {interval:?}");
    let mut watcher = BlockWatcher::new();

    loop {
        match watcher.tick(eco).await {
            Ok(true) => {
                let proposals = eco.proposals().await;
                let threshold = eco.quorum().await;
                println!("Block {}", watcher.last_block().unwrap_or_default());
                println!("{}", prettytable_proposals(&proposals, &threshold));
            }
            Ok(false) => {}
            Err(e) if e.class() == ErrorClass::Connectivity => return Err(e),
            Err(e) => {
                warn!(target: "ecosphere::watch", "{e}");
                eprintln!("{}", e.user_message());
            }
        }

        Timer::after(interval).await;
    }
}
