use anchor_lang::prelude::*;
use crate::errors::SwapError;
use crate::state::TakerWhitelist;
use crate::types::OfferStatus;
use crate::utils::fees::{calculate_fee, calculate_payment};

/// A single escrowed swap offer.
/// PDA: [b"offer", maker.key(), offer_id.to_le_bytes()]
///
/// The input asset sits in the vault PDA [b"vault", offer.key()], whose
/// authority is this account. While `status == Ongoing` the vault balance
/// always equals `remaining_amount`.
#[account]
pub struct Offer {
    /// Maker-scoped identifier, not globally unique
    pub offer_id: u64,

    /// Creator of the offer; owns the escrowed input tokens
    pub maker: Pubkey,

    /// Mint being offered (held in the vault)
    pub input_token_mint: Pubkey,

    /// Mint the maker wants in return
    pub output_token_mint: Pubkey,

    /// Input amount locked at creation; together with `expected_total_amount` fixes the rate
    pub initial_amount: u64,

    /// Output amount the maker expects for the whole `initial_amount`
    pub expected_total_amount: u64,

    /// Input amount still available to takers
    pub remaining_amount: u64,

    /// Output amount paid by takers so far (before fees)
    pub fulfilled_output_amount: u64,

    /// Unix timestamp after which the offer can no longer be filled
    pub deadline: i64,

    pub status: OfferStatus,

    /// Fee terms frozen at creation; later admin updates do not apply
    pub fee_percentage: u64,
    pub fee_wallet: Pubkey,

    /// Vault token account holding the escrow
    pub vault: Pubkey,

    pub created_at: i64,
    pub updated_at: i64,

    /// Bump for PDA derivation
    pub bump: u8,
}

/// Breakdown of a single fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillQuote {
    /// Input tokens released from the vault to the taker
    pub input_amount: u64,
    /// Output tokens the taker pays in total
    pub payment_amount: u64,
    /// Portion of `payment_amount` routed to the fee wallet
    pub fee_amount: u64,
    /// Portion of `payment_amount` routed to the maker
    pub net_amount: u64,
}

impl Offer {
    pub const SPACE: usize = 8 + // discriminator
        8 + // offer_id
        32 + // maker
        32 + // input_token_mint
        32 + // output_token_mint
        8 + // initial_amount
        8 + // expected_total_amount
        8 + // remaining_amount
        8 + // fulfilled_output_amount
        8 + // deadline
        1 + // status (enum = 1 byte)
        8 + // fee_percentage
        32 + // fee_wallet
        32 + // vault
        8 + // created_at
        8 + // updated_at
        1; // bump

    /// Checks creation arguments against the current time.
    pub fn validate_terms(initial_amount: u64, deadline: i64, now: i64) -> Result<()> {
        require!(initial_amount > 0, SwapError::InvalidAmount);
        require!(deadline > now, SwapError::InvalidDeadline);
        Ok(())
    }

    /// Every status change goes through here.
    pub fn transition(&mut self, next: OfferStatus) -> Result<()> {
        require!(self.status.can_transition_to(next), SwapError::InvalidOfferStatus);
        self.status = next;
        Ok(())
    }

    pub fn ensure_ongoing(&self) -> Result<()> {
        require!(self.status == OfferStatus::Ongoing, SwapError::InvalidOfferStatus);
        Ok(())
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now > self.deadline
    }

    /// Prices `input_amount` at the offer's fixed rate and snapshotted fee.
    ///
    /// The payment rounds down, so when `expected_total_amount < initial_amount`
    /// a fill small enough to price at zero costs the taker nothing. Makers
    /// bound this exposure through the taker whitelist.
    pub fn quote(&self, input_amount: u64) -> Result<FillQuote> {
        require!(
            input_amount > 0 && input_amount <= self.remaining_amount,
            SwapError::InsufficientAmount
        );

        let payment_amount =
            calculate_payment(input_amount, self.expected_total_amount, self.initial_amount)?;
        let (fee_amount, net_amount) = calculate_fee(payment_amount, self.fee_percentage)?;

        Ok(FillQuote { input_amount, payment_amount, fee_amount, net_amount })
    }

    /// Validates and books a fill by `taker`. Moves to `Completed` when the
    /// escrow is exhausted. The caller settles the returned quote.
    pub fn fill(
        &mut self,
        whitelist: &TakerWhitelist,
        taker: &Pubkey,
        input_amount: u64,
        now: i64,
    ) -> Result<FillQuote> {
        self.ensure_ongoing()?;
        require!(!self.is_expired(now), SwapError::OfferExpired);
        whitelist.ensure_contains(taker)?;

        let quote = self.quote(input_amount)?;

        self.remaining_amount = self
            .remaining_amount
            .checked_sub(quote.input_amount)
            .ok_or(SwapError::CalculationError)?;
        self.fulfilled_output_amount = self
            .fulfilled_output_amount
            .checked_add(quote.payment_amount)
            .ok_or(SwapError::CalculationError)?;
        self.updated_at = now;

        if self.remaining_amount == 0 {
            self.transition(OfferStatus::Completed)?;
        }

        Ok(quote)
    }

    /// Maker cancellation. Returns the escrow amount owed back to the maker.
    pub fn cancel(&mut self, caller: &Pubkey, now: i64) -> Result<u64> {
        require_keys_eq!(*caller, self.maker, SwapError::CannotCancelOffer);
        self.ensure_ongoing()?;

        self.transition(OfferStatus::Cancelled)?;
        self.updated_at = now;
        Ok(self.remaining_amount)
    }

    /// Expiry sweep. Returns the escrow amount owed back to the maker.
    /// The deadline is checked before the status.
    pub fn expire(&mut self, now: i64) -> Result<u64> {
        require!(self.is_expired(now), SwapError::OfferNotExpired);
        self.ensure_ongoing()?;

        self.transition(OfferStatus::Expired)?;
        self.updated_at = now;
        Ok(self.remaining_amount)
    }
}
