//! LocalChain: in-process development chain hosting FundMe and price mocks
//!
//! Models the parts of an EVM dev node the contracts depend on:
//! - Funded dev accounts (10 × 10 000 ETH, account 0 is the deployer)
//! - Native balances and nonces
//! - Gas accounting: every mined transaction costs `gas_used * gas_price`
//! - One block per transaction, plus empty blocks on demand
//! - Deterministic contract addresses: last 20 bytes of `sha256(sender ‖ nonce)`
//!
//! A call that reverts is rejected before inclusion: no gas is charged, no
//! block is mined and no state changes.
//!
//! The whole chain is serde-serializable so tooling can persist it between runs.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;
use types::ids::TxId;
use types::numeric::ether;

use crate::errors::{ChainError, TransferError};
use crate::fund_me::{CallContext, FundMe, ValueTransfer};
use crate::price_feed::MockV3Aggregator;

/// Chain id reported by local dev nodes
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// Number of pre-funded dev accounts
pub const DEV_ACCOUNT_COUNT: u64 = 10;

/// Starting balance of each dev account, in whole ether
pub const DEV_ACCOUNT_BALANCE_ETH: u64 = 10_000;

/// 1 gwei
pub const DEFAULT_GAS_PRICE: u64 = 1_000_000_000;

/// Kind of mined transaction; determines gas used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    DeployPriceFeed,
    DeployFundMe,
    UpdateAnswer,
    Fund,
    Withdraw,
    Transfer,
}

impl TxKind {
    /// Fixed gas charged for this kind of transaction.
    pub fn gas_used(self) -> u64 {
        match self {
            TxKind::DeployPriceFeed => 450_000,
            TxKind::DeployFundMe => 820_000,
            TxKind::UpdateAnswer => 60_000,
            TxKind::Fund => 95_000,
            TxKind::Withdraw => 45_000,
            TxKind::Transfer => 21_000,
        }
    }
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_id: TxId,
    pub kind: TxKind,
    pub from: Address,
    pub to: Option<Address>,
    /// Set for deployments
    pub contract_address: Option<Address>,
    pub block_number: u64,
    pub gas_used: u64,
    pub gas_price: U256,
}

impl Receipt {
    /// Native currency paid for gas.
    pub fn fee(&self) -> U256 {
        U256::from(self.gas_used) * self.gas_price
    }
}

/// Externally owned account state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: U256,
    pub nonce: u64,
    /// Incoming value transfers fail when set
    #[serde(default)]
    pub rejects_value: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalChain {
    chain_id: u64,
    block_number: u64,
    timestamp: i64,
    gas_price: U256,
    dev_accounts: Vec<Address>,
    accounts: HashMap<Address, Account>,
    price_feeds: HashMap<Address, MockV3Aggregator>,
    contracts: HashMap<Address, FundMe>,
}

impl LocalChain {
    /// Genesis with the default dev accounts.
    pub fn new() -> Self {
        let mut accounts = HashMap::new();
        let dev_accounts: Vec<Address> = (0..DEV_ACCOUNT_COUNT)
            .map(|index| derive_address(b"fundme-dev-account", index))
            .collect();
        for account in &dev_accounts {
            accounts.insert(
                *account,
                Account {
                    balance: ether(DEV_ACCOUNT_BALANCE_ETH),
                    ..Account::default()
                },
            );
        }

        Self {
            chain_id: DEFAULT_CHAIN_ID,
            block_number: 0,
            timestamp: chrono::Utc::now().timestamp(),
            gas_price: U256::from(DEFAULT_GAS_PRICE),
            dev_accounts,
            accounts,
            price_feeds: HashMap::new(),
            contracts: HashMap::new(),
        }
    }

    /// Override the gas price (zero makes transactions free).
    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = gas_price;
        self
    }

    // ───────────────────────── Chain info ─────────────────────────

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    /// Pre-funded dev accounts, in a stable order.
    pub fn dev_accounts(&self) -> &[Address] {
        &self.dev_accounts
    }

    /// The named deployer account (dev account 0).
    pub fn deployer(&self) -> Result<Address, ChainError> {
        self.dev_accounts
            .first()
            .copied()
            .ok_or(ChainError::NoDevAccounts)
    }

    // ───────────────────────── Accounts ─────────────────────────

    /// Native balance of an account, or the held balance of a FundMe contract.
    pub fn balance_of(&self, address: &Address) -> U256 {
        if let Some(contract) = self.contracts.get(address) {
            return contract.balance();
        }
        self.accounts
            .get(address)
            .map(|account| account.balance)
            .unwrap_or(U256::ZERO)
    }

    pub fn nonce_of(&self, address: &Address) -> u64 {
        self.accounts
            .get(address)
            .map(|account| account.nonce)
            .unwrap_or(0)
    }

    /// Overwrite an account's balance.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        self.accounts.entry(address).or_default().balance = balance;
    }

    /// Make an account refuse (or accept again) incoming value.
    pub fn set_rejects_value(&mut self, address: Address, rejects: bool) {
        self.accounts.entry(address).or_default().rejects_value = rejects;
    }

    // ───────────────────────── Deployment ─────────────────────────

    /// Deploy a `MockV3Aggregator` reporting `initial_answer` with `decimals`.
    pub fn deploy_price_feed(
        &mut self,
        from: Address,
        decimals: u8,
        initial_answer: i128,
    ) -> Result<Receipt, ChainError> {
        let kind = TxKind::DeployPriceFeed;
        self.ensure_can_pay(&from, U256::ZERO, kind)?;

        let address = derive_address(from.as_slice(), self.nonce_of(&from));
        let mock = MockV3Aggregator::new(decimals, initial_answer, self.next_timestamp());
        self.price_feeds.insert(address, mock);

        debug!(%address, decimals, initial_answer = %initial_answer, "Deployed MockV3Aggregator");
        Ok(self.settle(from, None, Some(address), U256::ZERO, kind))
    }

    /// Deploy a `FundMe` owned by `from` and bound to `price_feed`.
    ///
    /// The feed address is not checked, as on a real chain; a bad binding
    /// surfaces on the first `fund`.
    pub fn deploy_fund_me(
        &mut self,
        from: Address,
        price_feed: Address,
    ) -> Result<Receipt, ChainError> {
        let kind = TxKind::DeployFundMe;
        self.ensure_can_pay(&from, U256::ZERO, kind)?;

        let address = derive_address(from.as_slice(), self.nonce_of(&from));
        self.contracts
            .insert(address, FundMe::new(address, from, price_feed));

        debug!(%address, owner = %from, %price_feed, "Deployed FundMe");
        Ok(self.settle(from, None, Some(address), U256::ZERO, kind))
    }

    // ───────────────────────── Contract access ─────────────────────────

    pub fn fund_me(&self, address: &Address) -> Result<&FundMe, ChainError> {
        self.contracts
            .get(address)
            .ok_or(ChainError::UnknownContract { address: *address })
    }

    pub fn price_feed(&self, address: &Address) -> Option<&MockV3Aggregator> {
        self.price_feeds.get(address)
    }

    /// Push a new answer to a deployed mock.
    pub fn update_answer(
        &mut self,
        from: Address,
        feed: Address,
        answer: i128,
    ) -> Result<Receipt, ChainError> {
        let kind = TxKind::UpdateAnswer;
        self.ensure_can_pay(&from, U256::ZERO, kind)?;

        let timestamp = self.next_timestamp();
        let mock = self
            .price_feeds
            .get_mut(&feed)
            .ok_or(crate::errors::PriceFeedError::NotFound { address: feed })?;
        mock.update_answer(answer, timestamp);

        Ok(self.settle(from, Some(feed), None, U256::ZERO, kind))
    }

    // ───────────────────────── Transactions ─────────────────────────

    /// Call `fund` on the FundMe at `contract` with `value` attached.
    pub fn fund(
        &mut self,
        from: Address,
        contract: Address,
        value: U256,
    ) -> Result<Receipt, ChainError> {
        let kind = TxKind::Fund;
        self.ensure_can_pay(&from, value, kind)?;

        let fund_me = self
            .contracts
            .get_mut(&contract)
            .ok_or(ChainError::UnknownContract { address: contract })?;
        fund_me.fund(&CallContext::new(from, value), &self.price_feeds)?;

        Ok(self.settle(from, Some(contract), None, value, kind))
    }

    /// Call `withdraw` on the FundMe at `contract`.
    pub fn withdraw(&mut self, from: Address, contract: Address) -> Result<Receipt, ChainError> {
        let kind = TxKind::Withdraw;
        self.ensure_can_pay(&from, U256::ZERO, kind)?;

        let fund_me = self
            .contracts
            .get_mut(&contract)
            .ok_or(ChainError::UnknownContract { address: contract })?;
        let mut payout = Payout {
            accounts: &mut self.accounts,
        };
        fund_me.withdraw(&from, &mut payout)?;

        Ok(self.settle(from, Some(contract), None, U256::ZERO, kind))
    }

    /// Send plain value. A FundMe recipient treats it as `receive`.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<Receipt, ChainError> {
        let kind = TxKind::Transfer;
        self.ensure_can_pay(&from, value, kind)?;

        if let Some(fund_me) = self.contracts.get_mut(&to) {
            fund_me.receive(&CallContext::new(from, value), &self.price_feeds)?;
        } else {
            credit(&mut self.accounts, to, value)?;
        }

        Ok(self.settle(from, Some(to), None, value, kind))
    }

    // ───────────────────────── Blocks ─────────────────────────

    /// Mine an empty block. Returns the new block number.
    pub fn mine_block(&mut self) -> u64 {
        self.timestamp = self.next_timestamp();
        self.block_number += 1;
        self.block_number
    }

    /// Blocks including and on top of the receipt's block.
    pub fn confirmations(&self, receipt: &Receipt) -> u64 {
        if receipt.block_number > self.block_number {
            return 0;
        }
        self.block_number - receipt.block_number + 1
    }

    /// Mine empty blocks until `receipt` has `required` confirmations.
    /// Returns the confirmation count reached.
    pub fn wait_for_confirmations(&mut self, receipt: &Receipt, required: u64) -> u64 {
        while self.confirmations(receipt) < required {
            self.mine_block();
        }
        self.confirmations(receipt)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn next_timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp().max(self.timestamp + 1)
    }

    fn ensure_can_pay(&self, from: &Address, value: U256, kind: TxKind) -> Result<(), ChainError> {
        let fee = U256::from(kind.gas_used()) * self.gas_price;
        let required = value.saturating_add(fee);
        let available = self.balance_of(from);
        if available < required {
            return Err(ChainError::InsufficientFunds {
                account: *from,
                required,
                available,
            });
        }
        Ok(())
    }

    /// Debit value and fee, bump the nonce and mine the transaction's block.
    fn settle(
        &mut self,
        from: Address,
        to: Option<Address>,
        contract_address: Option<Address>,
        value: U256,
        kind: TxKind,
    ) -> Receipt {
        let gas_used = kind.gas_used();
        let fee = U256::from(gas_used) * self.gas_price;

        let account = self.accounts.entry(from).or_default();
        // ensure_can_pay checked value + fee against this balance
        account.balance = account.balance.saturating_sub(value.saturating_add(fee));
        account.nonce += 1;

        let block_number = self.mine_block();
        let receipt = Receipt {
            tx_id: TxId::new(),
            kind,
            from,
            to,
            contract_address,
            block_number,
            gas_used,
            gas_price: self.gas_price,
        };
        debug!(tx_id = %receipt.tx_id, ?kind, %from, block_number, "Mined transaction");
        receipt
    }
}

impl Default for LocalChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Value transfer out of a FundMe into externally owned accounts.
struct Payout<'a> {
    accounts: &'a mut HashMap<Address, Account>,
}

impl ValueTransfer for Payout<'_> {
    fn send_value(
        &mut self,
        _contract: &mut FundMe,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        credit(self.accounts, to, amount)
    }
}

fn credit(
    accounts: &mut HashMap<Address,
    Account>,
    to: Address,
    amount: U256,
) -> Result<(), TransferError> {
    let account = accounts.entry(to).or_default();
    if account.rejects_value {
        return Err(TransferError::Rejected { to, amount });
    }
    account.balance = account
        .balance
        .checked_add(amount)
        .ok_or(TransferError::Overflow)?;
    Ok(())
}

/// Last 20 bytes of `sha256(seed ‖ index)`.
pub fn derive_address(seed: &[u8], index: u64) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(index.to_be_bytes());
    let digest = hasher.finalize();
    Address::from_slice(&digest[12..])
}
