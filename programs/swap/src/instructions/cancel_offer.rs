use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::constants::*;
use crate::errors::SwapError;
use crate::events::OfferCancelled;
use crate::state::*;
use crate::types::{CancellationReason, OfferStatus};
use crate::utils::escrow::close_escrow_accounts;

/// Maker withdraws an Ongoing offer.
///
/// Everything left in the vault goes back to the maker. The vault and the
/// taker whitelist (if one was ever created) are closed and the offer is
/// marked Cancelled.
///
/// # Errors
/// * `CannotCancelOffer` - signer is not the maker
/// * `InvalidOfferStatus` - offer already Completed, Cancelled or Expired
pub fn cancel(ctx: Context<CancelOffer>) -> Result<()> {
    let clock = Clock::get()?;
    let maker = ctx.accounts.maker.key();
    let offer_key = ctx.accounts.offer.key();

    let remaining = ctx.accounts.offer.cancel(&maker, clock.unix_timestamp)?;

    let refund = close_escrow_accounts(
        &ctx.accounts.offer,
        &mut ctx.accounts.vault,
        &ctx.accounts.maker_token_account,
        &ctx.accounts.whitelist.to_account_info(),
        &ctx.accounts.maker.to_account_info(),
        &ctx.accounts.token_program,
    )?;
    ctx.accounts.protocol_stats.record_terminal(OfferStatus::Cancelled)?;

    let offer = &ctx.accounts.offer;
    msg!("Offer {} cancelled by maker, refunded {} ({} unfilled)", offer.offer_id, refund, remaining);

    emit!(OfferCancelled {
        offer: offer_key,
        offer_id: offer.offer_id,
        maker: offer.maker,
        token_mint: offer.input_token_mint,
        token_amount: refund,
        reason: CancellationReason::MakerCancelled,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CancelOffer<'info> {
    /// Receives the refund and the closed accounts' rent
    #[account(mut)]
    pub maker: Signer<'info>,

    #[account(
        mut,
        seeds = [OFFER_SEED, offer.maker.as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump = offer.bump
    )]
    pub offer: Box<Account<'info, Offer>>,

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
