//! FundMe: minimum-USD contributions, owner-only withdrawal
//!
//! State machine:
//!
//! ```text
//!            fund                    fund
//!   Empty ───────────▶ Funded(n) ◀─────────┐
//!     ▲                   │  └─────────────┘
//!     └───── withdraw ────┘   (owner only)
//! ```
//!
//! `withdraw` on `Empty` is permitted and pays out zero.
//!
//! The contract never moves native currency itself. Incoming value is credited
//! by the host before `fund` returns; outgoing value goes through the
//! [`ValueTransfer`] seam, which receives the contract back so a recipient can
//! re-enter it. `withdraw` zeroes all bookkeeping before calling that seam.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::conversion::{meets_minimum, minimum_usd, usd_value};

use crate::errors::{FundMeError, PriceFeedError, TransferError};
use crate::events::{ContractEvent, Funded, Withdrawn};
use crate::ledger::FunderLedger;
use crate::price_feed::PriceFeedDirectory;
use crate::security::Ownable;

/// Caller identity and attached value of one contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub value: U256,
}

impl CallContext {
    pub fn new(sender: Address, value: U256) -> Self {
        Self { sender, value }
    }
}

/// Outgoing native-currency transfer provided by the host.
pub trait ValueTransfer {
    /// Move `amount` out of `contract` to `to`.
    ///
    /// `contract` is the caller itself, handed back so the recipient side may
    /// call into it before this returns.
    fn send_value(
        &mut self,
        contract: &mut FundMe,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError>;
}

/// The custody contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundMe {
    address: Address,
    owner: Ownable,
    price_feed: Address,
    balance: U256,
    ledger: FunderLedger,
    /// In-memory log, not persisted; consumers drain it after each call
    #[serde(skip)]
    events: Vec<ContractEvent>,
}

impl FundMe {
    /// Construct at `address`, owned by `owner`, reading prices from
    /// `price_feed`. Neither binding can change afterwards.
    pub fn new(address: Address, owner: Address, price_feed: Address) -> Self {
        Self {
            address,
            owner: Ownable::new(owner),
            price_feed,
            balance: U256::ZERO,
            ledger: FunderLedger::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Fund ─────────────────────────

    /// Accept `ctx.value` from `ctx.sender` if it is worth at least the USD
    /// minimum at the bound price feed.
    ///
    /// Nothing is mutated unless the call succeeds.
    pub fn fund(
        &mut self,
        ctx: &CallContext,
        feeds: &dyn PriceFeedDirectory,
    ) -> Result<ContractEvent, FundMeError> {
        let usd = self.conversion_rate(ctx.value, feeds)?;
        if !meets_minimum(usd) {
            return Err(FundMeError::InsufficientValue {
                usd_value: usd,
                minimum: minimum_usd(),
            });
        }

        let new_balance = self
            .balance
            .checked_add(ctx.value)
            .ok_or(FundMeError::Overflow)?;
        // A funder's total never exceeds the balance, so this cannot overflow
        // once the balance check above passed.
        let total_funded = self.ledger.record(ctx.sender, ctx.value)?;
        self.balance = new_balance;

        debug!(
            contract = %self.address,
            funder = %ctx.sender,
            amount = %ctx.value,
            %total_funded,
            "Funded"
        );

        let event = ContractEvent::Funded(Funded {
            funder: ctx.sender,
            amount: ctx.value,
            total_funded,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Plain value transfer to the contract; same rules as `fund`.
    pub fn receive(
        &mut self,
        ctx: &CallContext,
        feeds: &dyn PriceFeedDirectory,
    ) -> Result<ContractEvent, FundMeError> {
        self.fund(ctx, feeds)
    }

    /// USD value (18 decimals) of `amount` at the bound price feed.
    pub fn conversion_rate(
        &self,
        amount: U256,
        feeds: &dyn PriceFeedDirectory,
    ) -> Result<U256, FundMeError> {
        let feed = feeds
            .price_feed(&self.price_feed)
            .ok_or(PriceFeedError::NotFound {
                address: self.price_feed,
            })?;
        let round = feed.latest_round_data()?;
        let usd = usd_value(amount, round.answer, feed.decimals()).map_err(PriceFeedError::from)?;
        Ok(usd)
    }

    // ───────────────────────── Withdraw ─────────────────────────

    /// Pay the whole balance to the owner and reset the ledger.
    ///
    /// Bookkeeping is zeroed before `transfer` runs. If the transfer fails,
    /// ledger, balance and event log are restored exactly.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        transfer: &mut dyn ValueTransfer,
    ) -> Result<ContractEvent, FundMeError> {
        self.owner.only_owner(caller)?;

        let saved_ledger = self.ledger.clone();
        let saved_balance = self.balance;
        let saved_events = self.events.len();

        let funders_cleared = self.ledger.clear();
        let amount = std::mem::take(&mut self.balance);
        let owner = self.owner.owner();

        if let Err(err) = transfer.send_value(self, owner, amount) {
            self.ledger = saved_ledger;
            self.balance = saved_balance;
            self.events.truncate(saved_events);
            return Err(FundMeError::TransferFailed(err));
        }

        debug!(
            contract = %self.address,
            %owner,
            %amount,
            funders_cleared,
            "Withdrawn"
        );

        let event = ContractEvent::Withdrawn(Withdrawn {
            owner,
            amount,
            funders_cleared,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Views ─────────────────────────

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner.owner()
    }

    pub fn price_feed(&self) -> Address {
        self.price_feed
    }

    /// Native currency held by the contract.
    pub fn balance(&self) -> U256 {
        self.balance
    }

    pub fn funder(&self, index: usize) -> Result<Address, FundMeError> {
        self.ledger.funder(index)
    }

    pub fn funders(&self) -> &[Address] {
        self.ledger.funders()
    }

    pub fn address_to_amount_funded(&self, funder: &Address) -> U256 {
        self.ledger.amount_funded(funder)
    }

    /// The contribution threshold in 18-decimal USD.
    pub fn minimum_usd(&self) -> U256 {
        minimum_usd()
    }

    /// Whether `balance` equals the ledger total.
    pub fn is_balanced(&self) -> bool {
        self.ledger.total() == Some(self.balance)
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price_feed::MockV3Aggregator;
    use std::collections::HashMap;
    use types::numeric::{ether, parse_ether, usd};

    const PRICE: i128 = 2_000_000_000_000_000_000_000;

    fn owner() -> Address {
        Address::with_last_byte(0x01)
    }

    fn feed_address() -> Address {
        Address::with_last_byte(0xfe)
    }

    fn setup() -> (FundMe, HashMap<Address, MockV3Aggregator>) {
        let mut feeds = HashMap::new();
        feeds.insert(feed_address(), MockV3Aggregator::new(18, PRICE, 0));
        let contract = FundMe::new(Address::with_last_byte(0xcc), owner(), feed_address());
        (contract, feeds)
    }

    /// Credits every payout, keeping a record.
    #[derive(Default)]
    struct Wallets {
        paid: Vec<(Address, U256)>,
    }

    impl ValueTransfer for Wallets {
        fn send_value(
            &mut self,
            _contract: &mut FundMe,
            to: Address,
            amount: U256,
        ) -> Result<(), TransferError> {
            self.paid.push((to, amount));
            Ok(())
        }
    }

    struct Rejecting;

    impl ValueTransfer for Rejecting {
        fn send_value(
            &mut self,
            _contract: &mut FundMe,
            to: Address,
            amount: U256,
        ) -> Result<(), TransferError> {
            Err(TransferError::Rejected { to, amount })
        }
    }

    // ─── Constructor ───

    #[test]
    fn test_constructor_bindings() {
        let (contract, _) = setup();
        assert_eq!(contract.owner(), owner());
        assert_eq!(contract.price_feed(), feed_address());
        assert_eq!(contract.balance(), U256::ZERO);
        assert!(contract.funders().is_empty());
    }

    // ─── Fund ───

    #[test]
    fn test_fund_zero_value_rejected() {
        let (mut contract, feeds) = setup();
        let result = contract.fund(&CallContext::new(owner(), U256::ZERO), &feeds);
        assert_eq!(
            result,
            Err(FundMeError::InsufficientValue {
                usd_value: U256::ZERO,
                minimum: usd(50),
            })
        );
        assert!(contract.events().is_empty());
    }

    #[test]
    fn test_fund_records_amount_and_funder() {
        let (mut contract, feeds) = setup();
        let value = parse_ether("0.1").unwrap();
        contract.fund(&CallContext::new(owner(), value), &feeds).unwrap();

        assert_eq!(contract.balance(), value);
        assert_eq!(contract.funder(0).unwrap(), owner());
        assert_eq!(contract.address_to_amount_funded(&owner()), value);
        assert!(contract.is_balanced());
    }

    #[test]
    fn test_fund_emits_cumulative_total() {
        let (mut contract, feeds) = setup();
        let value = parse_ether("0.1").unwrap();
        contract.fund(&CallContext::new(owner(), value), &feeds).unwrap();
        let event = contract.fund(&CallContext::new(owner(), value), &feeds).unwrap();

        assert_eq!(
            event,
            ContractEvent::Funded(Funded {
                funder: owner(),
                amount: value,
                total_funded: value * U256::from(2u64),
            })
        );
        assert_eq!(contract.funders().len(), 1);
    }

    #[test]
    fn test_fund_without_price_feed() {
        let (mut contract, _) = setup();
        let empty: HashMap<Address, MockV3Aggregator> = HashMap::new();
        let result = contract.fund(&CallContext::new(owner(), ether(1)), &empty);
        assert_eq!(
            result,
            Err(FundMeError::PriceFeed(PriceFeedError::NotFound {
                address: feed_address()
            }))
        );
    }

    #[test]
    fn test_fund_with_negative_price_rejected() {
        let (mut contract, mut feeds) = setup();
        feeds.get_mut(&feed_address()).unwrap().update_answer(-1, 1);
        let result = contract.fund(&CallContext::new(owner(), ether(1)), &feeds);
        assert!(matches!(result, Err(FundMeError::PriceFeed(PriceFeedError::Conversion(_)))));
        assert_eq!(contract.balance(), U256::ZERO);
    }

    #[test]
    fn test_fund_follows_price_updates() {
        let (mut contract, mut feeds) = setup();
        let value = parse_ether("0.03").unwrap();
        // 0.03 ETH is 60 USD at 2000 but 30 USD at 1000
        feeds
            .get_mut(&feed_address())
            .unwrap()
            .update_answer(PRICE / 2, 1);
        assert!(matches!(
            contract.fund(&CallContext::new(owner(), value), &feeds),
            Err(FundMeError::InsufficientValue { .. })
        ));
    }

    #[test]
    fn test_receive_behaves_like_fund() {
        let (mut contract, feeds) = setup();
        let value = parse_ether("0.05").unwrap();
        contract.receive(&CallContext::new(owner(), value), &feeds).unwrap();
        assert_eq!(contract.address_to_amount_funded(&owner()), value);
    }

    #[test]
    fn test_conversion_rate() {
        let (contract, feeds) = setup();
        assert_eq!(contract.conversion_rate(ether(1), &feeds).unwrap(), usd(2000));
    }

    // ─── Withdraw ───

    #[test]
    fn test_withdraw_pays_owner_and_resets() {
        let (mut contract, feeds) = setup();
        let funder = Address::with_last_byte(0x02);
        let value = parse_ether("0.1").unwrap();
        contract.fund(&CallContext::new(funder, value), &feeds).unwrap();

        let mut wallets = Wallets::default();
        let event = contract.withdraw(&owner(), &mut wallets).unwrap();

        assert_eq!(wallets.paid, vec![(owner(), value)]);
        assert_eq!(
            event,
            ContractEvent::Withdrawn(Withdrawn {
                owner: owner(),
                amount: value,
                funders_cleared: 1,
            })
        );
        assert_eq!(contract.balance(), U256::ZERO);
        assert!(contract.funders().is_empty());
        assert_eq!(contract.address_to_amount_funded(&funder), U256::ZERO);
    }

    #[test]
    fn test_withdraw_non_owner() {
        let (mut contract, feeds) = setup();
        contract
            .fund(&CallContext::new(owner(), ether(1)), &feeds)
            .unwrap();
        let eve = Address::with_last_byte(0x0e);

        let mut wallets = Wallets::default();
        let result = contract.withdraw(&eve, &mut wallets);

        assert_eq!(result, Err(FundMeError::NotOwner { caller: eve }));
        assert!(wallets.paid.is_empty());
        assert_eq!(contract.balance(), ether(1));
    }

    #[test]
    fn test_withdraw_empty_is_noop_payout() {
        let (mut contract, _) = setup();
        let mut wallets = Wallets::default();
        contract.withdraw(&owner(), &mut wallets).unwrap();
        contract.withdraw(&owner(), &mut wallets).unwrap();
        assert_eq!(wallets.paid, vec![(owner(), U256::ZERO), (owner(), U256::ZERO)]);
    }

    #[test]
    fn test_withdraw_rolls_back_on_failed_transfer() {
        let (mut contract, feeds) = setup();
        contract
            .fund(&CallContext::new(Address::with_last_byte(0x02), ether(1)), &feeds)
            .unwrap();
        let before = contract.clone();

        let result = contract.withdraw(&owner(), &mut Rejecting);

        assert!(matches!(result, Err(FundMeError::TransferFailed(_))));
        assert_eq!(contract, before);
    }

    #[test]
    fn test_drain_events() {
        let (mut contract, feeds) = setup();
        contract
            .fund(&CallContext::new(owner(), ether(1)), &feeds)
            .unwrap();
        assert_eq!(contract.drain_events().len(), 1);
        assert!(contract.events().is_empty());
    }
}
