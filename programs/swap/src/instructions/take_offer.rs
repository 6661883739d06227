use anchor_lang::prelude::*;
use anchor_spl::token::{transfer, Token, TokenAccount, Transfer};
use crate::constants::*;
use crate::errors::SwapError;
use crate::events::OfferTaken;
use crate::state::*;
use crate::types::OfferStatus;
use crate::utils::escrow::{close_escrow_accounts, load_taker_whitelist, release_from_vault};

/// Fill `input_token_amount` of an offer.
///
/// The taker pays `floor(input * expected_total / initial)` output tokens:
/// the snapshotted fee share to the fee wallet, the rest to the maker.
/// The vault releases `input_token_amount` input tokens to the taker.
/// When the offer is exhausted it completes: anything still in the vault is
/// swept to the maker and the vault and whitelist are closed with rent
/// returned to the maker.
///
/// An offer whose maker never created a whitelist fails `TakerNotWhitelisted`.
pub fn take(ctx: Context<TakeOffer>, input_token_amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let taker = ctx.accounts.taker.key();

    let whitelist = load_taker_whitelist(&ctx.accounts.offer, &ctx.accounts.whitelist)?
        .ok_or(SwapError::TakerNotWhitelisted)?;
    let quote = ctx.accounts.offer.fill(
        &whitelist,
        &taker,
        input_token_amount,
        clock.unix_timestamp,
    )?;

    // Transfer 1: fee share to the fee wallet
    if quote.fee_amount > 0 {
        let fee_transfer_ctx = CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.taker_payment_token_account.to_account_info(),
                to: ctx.accounts.fee_token_account.to_account_info(),
                authority: ctx.accounts.taker.to_account_info(),
            },
        );
        transfer(fee_transfer_ctx, quote.fee_amount)?;
    }

    // Transfer 2: net payment to the maker
    if quote.net_amount > 0 {
        let payment_transfer_ctx = CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.taker_payment_token_account.to_account_info(),
                to: ctx.accounts.maker_receive_token_account.to_account_info(),
                authority: ctx.accounts.taker.to_account_info(),
            },
        );
        transfer(payment_transfer_ctx, quote.net_amount)?;
    }

    // Transfer 3: escrowed input tokens to the taker
    release_from_vault(
        &ctx.accounts.offer,
        &ctx.accounts.vault,
        &ctx.accounts.taker_receive_token_account,
        &ctx.accounts.token_program,
        quote.input_amount,
    )?;

    let completed = ctx.accounts.offer.status == OfferStatus::Completed;
    let offer = &ctx.accounts.offer;
    msg!(
        "Offer {} filled by {}: in {}, paid {}, fee {}, remaining {}",
        offer.offer_id,
        taker,
        quote.input_amount,
        quote.payment_amount,
        quote.fee_amount,
        offer.remaining_amount
    );

    emit!(OfferTaken {
        offer: offer.key(),
        offer_id: offer.offer_id,
        maker: offer.maker,
        taker,
        input_token_mint: offer.input_token_mint,
        output_token_mint: offer.output_token_mint,
        input_token_amount: quote.input_amount,
        payment_amount: quote.payment_amount,
        fee_amount: quote.fee_amount,
        net_amount: quote.net_amount,
        remaining_amount: offer.remaining_amount,
        completed,
        timestamp: clock.unix_timestamp,
    });

    if completed {
        ctx.accounts.protocol_stats.record_terminal(OfferStatus::Completed)?;
        let surplus = close_escrow_accounts(
            &ctx.accounts.offer,
            &mut ctx.accounts.vault,
            &ctx.accounts.maker_token_account,
            &ctx.accounts.whitelist.to_account_info(),
            &ctx.accounts.maker.to_account_info(),
            &ctx.accounts.token_program,
        )?;
        msg!("Offer {} completed, {} surplus returned to maker", ctx.accounts.offer.offer_id, surplus);
    }

    Ok(())
}

#[derive(Accounts)]
pub struct TakeOffer<'info> {
    /// Pays output tokens, receives input tokens; must be on the whitelist
    #[account(mut)]
    pub taker: Signer<'info>,

    #[account(
        mut,
        seeds = [OFFER_SEED, offer.maker.as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump = offer.bump
    )]
    pub offer: Box<Account<'info, Offer>>,

    /// CHECK: Receives rent from closed accounts; must be the offer maker
    #[account(mut, address = offer.maker @ SwapError::InvalidMaker)]
    pub maker: UncheckedAccount<'info>,

    /// CHECK: Taker whitelist PDA, loaded in the handler; may not exist yet
    #[account(
        mut,
        seeds = [TAKER_WHITELIST_SEED, offer.maker.as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump
    )]
    pub whitelist: UncheckedAccount<'info>,

    #[account(mut, seeds = [PROTOCOL_STATS_SEED], bump = protocol_stats.bump)]
    pub protocol_stats: Box<Account<'info, ProtocolStats>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, offer.key().as_ref()],
        bump,
        constraint = vault.owner == offer.key() @ SwapError::InvalidVaultOwner,
        constraint = vault.mint == offer.input_token_mint @ SwapError::InvalidTokenMint
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = taker_payment_token_account.owner == taker.key() @ SwapError::InvalidTokenAccount,
        constraint = taker_payment_token_account.mint == offer.output_token_mint @ SwapError::InvalidTokenMint
    )]
    pub taker_payment_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = taker_receive_token_account.owner == taker.key() @ SwapError::InvalidTokenAccount,
        constraint = taker_receive_token_account.mint == offer.input_token_mint @ SwapError::InvalidTokenMint
    )]
    pub taker_receive_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = maker_receive_token_account.owner == offer.maker @ SwapError::InvalidTokenAccount,
        constraint = maker_receive_token_account.mint == offer.output_token_mint @ SwapError::InvalidTokenMint
    )]
    pub maker_receive_token_account: Box<Account<'info, TokenAccount>>,

    /// Receives vault leftovers when this fill completes the offer
    #[account(
        mut,
        constraint = maker_token_account.owner == offer.maker @ SwapError::InvalidTokenAccount,
        constraint = maker_token_account.mint == offer.input_token_mint @ SwapError::InvalidTokenMint
    )]
    pub maker_token_account: Box<Account<'info, TokenAccount>>,

    /// Must belong to the fee wallet snapshotted at offer creation
    #[account(
        mut,
        constraint = fee_token_account.owner == offer.fee_wallet @ SwapError::InvalidTokenAccount,
        constraint = fee_token_account.mint == offer.output_token_mint @ SwapError::InvalidTokenMint
    )]
    pub fee_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
