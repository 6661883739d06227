pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod types;
pub mod utils;

pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use state::*;
pub use types::*;

use anchor_lang::prelude::*;

declare_id!("24Su4NEPKHey1pnr7LS35h4hTzCUANfsysMT9oy5G8iU");

#[program]
pub mod swap {
    use super::*;

    // Admin

    /// One-time setup of admin identity, fee terms and mint whitelist
    pub fn initialize_admin(
        ctx: Context<Initialize>,
        fee_percentage: u64,
        fee_wallet: Pubkey,
        require_whitelist: bool,
        initial_mints: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::admin::initialize(ctx, fee_percentage, fee_wallet, require_whitelist, initial_mints)
    }

    pub fn add_mints_to_whitelist(
        ctx: Context<ModifyMintWhitelist>,
        new_mints: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::admin::add_mints(ctx, new_mints)
    }

    pub fn remove_mints_from_whitelist(
        ctx: Context<ModifyMintWhitelist>,
        remove_mints: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::admin::remove_mints(ctx, remove_mints)
    }

    pub fn update_fee_percentage(ctx: Context<UpdateFee>, new_fee: u64) -> Result<()> {
        instructions::admin::fee_update(ctx, new_fee)
    }

    pub fn update_fee_address(ctx: Context<UpdateFee>, new_address: Pubkey) -> Result<()> {
        instructions::admin::fee_address_update(ctx, new_address)
    }

    pub fn toggle_require_whitelist(ctx: Context<ToggleRequireWhitelist>) -> Result<()> {
        instructions::admin::toggle_whitelist(ctx)
    }

    /// Sweep an offer past its deadline; escrow goes back to the maker
    pub fn expire_offer(ctx: Context<ExpireOffer>) -> Result<()> {
        instructions::expire_offer::expire(ctx)
    }

    // Maker

    /// Lock `token_amount` of the input mint in a fresh vault and open the offer
    pub fn create_offer_and_send_tokens_to_vault(
        ctx: Context<CreateOffer>,
        offer_id: u64,
        token_amount: u64,
        expected_total_amount: u64,
        deadline: i64,
    ) -> Result<()> {
        instructions::create_offer::create(ctx, offer_id, token_amount, expected_total_amount, deadline)
    }

    /// Replace the offer's taker whitelist (created on first use)
    pub fn manage_whitelist(ctx: Context<ManageWhitelist>, takers: Vec<Pubkey>) -> Result<()> {
        instructions::manage_takers::manage(ctx, takers)
    }

    pub fn add_taker_whitelist(ctx: Context<UpdateTakers>, takers: Vec<Pubkey>) -> Result<()> {
        instructions::manage_takers::add_takers(ctx, takers)
    }

    pub fn remove_taker_whitelist(ctx: Context<UpdateTakers>, takers: Vec<Pubkey>) -> Result<()> {
        instructions::manage_takers::remove_takers(ctx, takers)
    }

    pub fn cancel_offer(ctx: Context<CancelOffer>) -> Result<()> {
        instructions::cancel_offer::cancel(ctx)
    }

    // Taker

    /// Fill all or part of an offer at its fixed rate
    pub fn take_offer(ctx: Context<TakeOffer>, input_token_amount: u64) -> Result<()> {
        instructions::take_offer::take(ctx, input_token_amount)
    }
}
