use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::constants::*;
use crate::errors::SwapError;
use crate::events::OfferCancelled;
use crate::state::*;
use crate::types::{CancellationReason, OfferStatus};
use crate::instructions::admin::authorize_admin;
use crate::utils::escrow::close_escrow_accounts;

/// Admin sweep of an Ongoing offer whose deadline has passed.
/// Same settlement as a maker cancel: refund, close, terminal status.
pub fn expire(ctx: Context<ExpireOffer>) -> Result<()> {
    let clock = Clock::get()?;
    authorize_admin(&ctx.accounts.admin_config, &ctx.accounts.admin)?;

    let offer_key = ctx.accounts.offer.key();
    let remaining = ctx.accounts.offer.expire(clock.unix_timestamp)?;

    let refund = close_escrow_accounts(
        &ctx.accounts.offer,
        &mut ctx.accounts.vault,
        &ctx.accounts.maker_token_account,
        &ctx.accounts.whitelist.to_account_info(),
        &ctx.accounts.maker.to_account_info(),
        &ctx.accounts.token_program,
    )?;
    ctx.accounts.protocol_stats.record_terminal(OfferStatus::Expired)?;

    let offer = &ctx.accounts.offer;
    msg!(
        "Offer {} expired (deadline {}, now {}), refunded {} ({} unfilled)",
        offer.offer_id,
        offer.deadline,
        clock.unix_timestamp,
        refund,
        remaining
    );

    emit!(OfferCancelled {
        offer: offer_key,
        offer_id: offer.offer_id,
        maker: offer.maker,
        token_mint: offer.input_token_mint,
        token_amount: refund,
        reason: CancellationReason::Expired,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ExpireOffer<'info> {
    pub admin: Signer<'info>,

    /// CHECK: Admin record PDA, loaded in the handler
    #[account(seeds = [ADMIN_CONFIG_SEED], bump)]
    pub admin_config: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [OFFER_SEED, offer.maker.as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump = offer.bump
    )]
    pub offer: Box<Account<'info, Offer>>,

    /// CHECK: Rent destination; must be the offer maker
    #[account(mut, address = offer.maker @ SwapError::InvalidMaker)]
    pub maker: UncheckedAccount<'info>,

    /// CHECK: Taker whitelist PDA; closed in the handler when it exists
    #[account(
        mut,
        seeds = [TAKER_WHITELIST_SEED, offer.maker.as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump
    )]
    pub whitelist: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = maker_token_account.owner == offer.maker @ SwapError::InvalidTokenAccount,
        constraint = maker_token_account.mint == offer.input_token_mint @ SwapError::InvalidTokenMint
    )]
    pub maker_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, offer.key().as_ref()],
        bump,
        constraint = vault.owner == offer.key() @ SwapError::InvalidVaultOwner
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, seeds = [PROTOCOL_STATS_SEED], bump = protocol_stats.bump)]
    pub protocol_stats: Box<Account<'info, ProtocolStats>>,

    pub token_program: Program<'info, Token>,
}
