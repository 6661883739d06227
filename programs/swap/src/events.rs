use anchor_lang::prelude::*;
use crate::types::CancellationReason;

#[event]
pub struct AdminInitialized {
    pub admin: Pubkey,
    pub fee_percentage: u64,
    pub fee_wallet: Pubkey,
    pub require_whitelist: bool,
    pub initial_mints: Vec<Pubkey>,
    pub timestamp: i64,
}

#[event]
pub struct FeeUpdated {
    pub admin: Pubkey,
    pub old_fee: u64,
    pub new_fee: u64,
    pub timestamp: i64,
}

#[event]
pub struct FeeWalletUpdated {
    pub admin: Pubkey,
    pub old_wallet: Pubkey,
    pub new_wallet: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct WhitelistRequirementToggled {
    pub admin: Pubkey,
    pub new_status: bool,
    pub timestamp: i64,
}

#[event] pub struct MintsAddedToWhitelist     { pub admin: Pubkey, pub new_mints: Vec<Pubkey>,     pub timestamp: i64 }
#[event] pub struct MintsRemovedFromWhitelist { pub admin: Pubkey, pub removed_mints: Vec<Pubkey>, pub timestamp: i64 }

#[event]
pub struct OfferCreated {
    pub offer: Pubkey,
    pub offer_id: u64,
    pub maker: Pubkey,
    pub input_token_mint: Pubkey,
    pub output_token_mint: Pubkey,
    pub token_amount: u64,
    pub expected_amount: u64,
    pub deadline: i64,
    pub fee_percentage: u64,
    pub fee_wallet: Pubkey,
    pub vault: Pubkey,
    pub timestamp: i64,
}

/// Emitted on every taker whitelist change with the resulting list.
#[event]
pub struct TakerUpdated {
    pub offer: Pubkey,
    pub offer_id: u64,
    pub maker: Pubkey,
    pub takers: Vec<Pubkey>,
    pub timestamp: i64,
}

#[event]
pub struct OfferTaken {
    pub offer: Pubkey,
    pub offer_id: u64,
    pub maker: Pubkey,
    pub taker: Pubkey,
    pub input_token_mint: Pubkey,
    pub output_token_mint: Pubkey,
    pub input_token_amount: u64,
    pub payment_amount: u64,    // Total paid by taker
    pub fee_amount: u64,        // To fee wallet
    pub net_amount: u64,        // To maker
    pub remaining_amount: u64,
    pub completed: bool,
    pub timestamp: i64,
}

#[event]
pub struct OfferCancelled {
    pub offer: Pubkey,
    pub offer_id: u64,
    pub maker: Pubkey,
    pub token_mint: Pubkey,
    pub token_amount: u64, // Returned to maker
    pub reason: CancellationReason,
    pub timestamp: i64,
}
