use anchor_lang::prelude::*;
use crate::constants::{BPS_DENOMINATOR, MAX_WHITELISTED_MINTS};
use crate::errors::SwapError;
use crate::types::OfferStatus;

/// Administrator identity. Written once by `initialize_admin`, never changed.
/// PDA: [b"admin_config"]
#[account]
pub struct AdminConfig {
    /// Only this key may run administrative instructions
    pub admin: Pubkey,

    /// Presence flag guarding the one-time initialization
    pub is_initialized: bool,

    pub bump: u8,
}

impl AdminConfig {
    pub const SPACE: usize = 8 + // discriminator
        32 + // admin
        1 + // is_initialized
        1; // bump

    pub fn ensure_uninitialized(&self) -> Result<()> {
        require!(!self.is_initialized, SwapError::AlreadyInitialized);
        Ok(())
    }

    /// Fails `AdminNotInitialized` before setup, `UnauthorizedAdmin` for any other key.
    pub fn authorize(&self, signer: &Pubkey) -> Result<()> {
        require!(self.is_initialized, SwapError::AdminNotInitialized);
        require_keys_eq!(self.admin, *signer, SwapError::UnauthorizedAdmin);
        Ok(())
    }
}

/// Protocol fee terms. Offers snapshot these at creation.
/// PDA: [b"fee"]
#[account]
pub struct FeeConfig {
    /// Fee in basis points (1/100th of a percent), 0..=10_000
    pub fee_percentage: u64,

    /// Wallet whose token accounts receive protocol fees
    pub fee_address: Pubkey,

    pub bump: u8,
}

impl FeeConfig {
    pub const SPACE: usize = 8 + // discriminator
        8 + // fee_percentage
        32 + // fee_address
        1; // bump

    pub fn validate_fee_percentage(fee_percentage: u64) -> Result<()> {
        require!(fee_percentage <= BPS_DENOMINATOR, SwapError::InvalidFeePercentage);
        Ok(())
    }

    pub fn validate_fee_address(fee_address: &Pubkey) -> Result<()> {
        require!(*fee_address != Pubkey::default(), SwapError::InvalidAddress);
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        require!(self.fee_address != Pubkey::default(), SwapError::FeeConfigNotInitialized);
        Ok(())
    }

    /// Returns the previous percentage.
    pub fn set_fee_percentage(&mut self, new_fee: u64) -> Result<u64> {
        Self::validate_fee_percentage(new_fee)?;
        let old_fee = self.fee_percentage;
        self.fee_percentage = new_fee;
        Ok(old_fee)
    }

    /// Returns the previous address.
    pub fn set_fee_address(&mut self, new_address: Pubkey) -> Result<Pubkey> {
        Self::validate_fee_address(&new_address)?;
        let old_address = self.fee_address;
        self.fee_address = new_address;
        Ok(old_address)
    }
}

/// Global toggle for mint whitelisting.
/// PDA: [b"whitelist_config"]
#[account]
pub struct WhitelistConfig {
    /// true = only whitelisted mints may be traded
    pub require_whitelist: bool,

    pub bump: u8,
}

impl WhitelistConfig {
    pub const SPACE: usize = 8 + 1 + 1;

    /// Flips the requirement and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.require_whitelist = !self.require_whitelist;
        self.require_whitelist
    }
}

/// Mints eligible for trading when `WhitelistConfig::require_whitelist` is set.
/// PDA: [b"mint_whitelist"]
#[account]
pub struct MintWhitelist {
    /// Unique, at most MAX_WHITELISTED_MINTS entries
    pub mints: Vec<Pubkey>,

    pub bump: u8,
}

impl MintWhitelist {
    pub const SPACE: usize = 8 + // discriminator
        4 + (32 * MAX_WHITELISTED_MINTS) + // mints
        1; // bump

    pub fn contains(&self, mint: &Pubkey) -> bool {
        self.mints.contains(mint)
    }

    /// Adds every mint or none of them.
    pub fn add(&mut self, new_mints: &[Pubkey]) -> Result<()> {
        require!(
            self.mints.len() + new_mints.len() <= MAX_WHITELISTED_MINTS,
            SwapError::TooManyMints
        );

        let mut mints = self.mints.clone();
        for mint in new_mints {
            require!(!mints.contains(mint), SwapError::MintAlreadyWhitelisted);
            mints.push(*mint);
        }

        self.mints = mints;
        Ok(())
    }

    /// Removes every mint or none of them.
    pub fn remove(&mut self, remove_mints: &[Pubkey]) -> Result<()> {
        let mut mints = self.mints.clone();
        for mint in remove_mints {
            let position = mints
                .iter()
                .position(|m| m == mint)
                .ok_or(SwapError::MintNotWhitelisted)?;
            mints.remove(position);
        }

        self.mints = mints;
        Ok(())
    }

    /// Both sides of a trade must be whitelisted while the policy is on.
    pub fn ensure_tradable(
        &self,
        require_whitelist: bool,
        input_mint: &Pubkey,
        output_mint: &Pubkey,
    ) -> Result<()> {
        if require_whitelist {
            require!(self.contains(input_mint), SwapError::MintNotWhitelisted);
            require!(self.contains(output_mint), SwapError::MintNotWhitelisted);
        }
        Ok(())
    }
}

/// Offer counters, updated on every lifecycle transition.
/// PDA: [b"protocol_stats"]
#[account]
#[derive(Default)]
pub struct ProtocolStats {
    pub total_offers: u64,
    pub active_offers: u64,
    pub completed_offers: u64,
    pub cancelled_offers: u64,
    pub expired_offers: u64,
    pub bump: u8,
}

impl ProtocolStats {
    pub const SPACE: usize = 8 + (8 * 5) + 1;

    pub fn record_created(&mut self) -> Result<()> {
        self.total_offers = self.total_offers.checked_add(1).ok_or(SwapError::SequenceOverflow)?;
        self.active_offers = self.active_offers.checked_add(1).ok_or(SwapError::SequenceOverflow)?;
        Ok(())
    }

    /// Moves one offer out of the active bucket into the terminal one.
    pub fn record_terminal(&mut self, status: OfferStatus) -> Result<()> {
        let bucket = match status {
            OfferStatus::Completed => &mut self.completed_offers,
            OfferStatus::Cancelled => &mut self.cancelled_offers,
            OfferStatus::Expired => &mut self.expired_offers,
            _ => return err!(SwapError::InvalidOfferStatus),
        };
        let active = self.active_offers.checked_sub(1).ok_or(SwapError::SequenceOverflow)?;
        *bucket = bucket.checked_add(1).ok_or(SwapError::SequenceOverflow)?;
        self.active_offers = active;
        Ok(())
    }
}
