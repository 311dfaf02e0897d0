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

use ethers::types::U256;
use log::info;

use crate::{model::Confirmation, token::ECO_DECIMALS, Eco, Error, Result};

/// ESG credit offered on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditListing {
    /// ERC-1155 token ID of the credit
    pub id: u64,
    pub name: &'static str,
    pub available: u64,
    /// Price of a single credit, in whole ECO
    pub price: u64,
}

/// Credits currently on offer. The contract keeps no catalog of its own.
pub const CATALOG: [CreditListing; 3] = [
    CreditListing { id: 1, name: "Environmental Project A", available: 1000, price: 25 },
    CreditListing { id: 2, name: "Social Initiative B", available: 500, price: 30 },
    CreditListing { id: 3, name: "Governance Program C", available: 750, price: 28 },
];

/// Credit ID `sell` burns when none is given
pub const DEFAULT_SELL_CREDIT_ID: u64 = 1;

pub fn listings() -> &'static [CreditListing] {
    &CATALOG
}

pub fn listing(credit_id: u64) -> Result<&'static CreditListing> {
    CATALOG.iter().find(|c| c.id == credit_id).ok_or(Error::UnknownCredit(credit_id))
}

/// Wei to attach when buying `amount` credits of `listing`.
pub fn purchase_value(listing: &CreditListing, amount: u64) -> Result<U256> {
    if amount == 0 {
        return Err(Error::InvalidAmount(String::from("amount must be greater than zero")))
    }

    if amount > listing.available {
        return Err(Error::InvalidAmount(format!(
            "only {} credits of {} are available",
            listing.available, listing.name
        )))
    }

    U256::from(listing.price)
        .checked_mul(U256::from(amount))
        .and_then(|v| v.checked_mul(U256::exp10(ECO_DECIMALS as usize)))
        .ok_or(Error::ArithmeticOverflow("purchase value"))
}

impl Eco {
    /// Mint `amount` credits of `credit_id`, paying the listed price.
    pub async fn buy(&self, credit_id: u64, amount: u64) -> Result<Confirmation> {
        let listing = listing(credit_id)?;
        let value = purchase_value(listing, amount)?;

        info!(
            target: "ecosphere::market",
            "Buying {amount} credits of \"{}\" for {value} wei", listing.name
        );
        let pending = self.client.mint_credits(credit_id, U256::from(amount), value).await?;
        self.client.confirm(pending).await
    }

    /// Burn `amount` credits of `credit_id` held by the connected account.
    pub async fn sell(&self, credit_id: u64, amount: u64) -> Result<Confirmation> {
        if amount == 0 {
            return Err(Error::InvalidAmount(String::from("amount must be greater than zero")))
        }

        info!(target: "ecosphere::market", "Selling {amount} credits of ID {credit_id}");
        let pending = self.client.burn_credits(credit_id, U256::from(amount)).await?;
        self.client.confirm(pending).await
    }
}
