use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::SwapError;
use crate::events::TakerUpdated;
use crate::state::*;

/// Replace the offer's taker whitelist with `takers`.
/// The whitelist PDA is created on the first call.
///
/// # Errors
/// * `UnauthorizedMaker` - signer is not the offer maker
/// * `InvalidMaker` - whitelist is bound to another maker/offer
/// * `InvalidOfferStatus` - offer is not Ongoing
/// * `EmptyTakersList`, `WhitelistFull`, `TakerAlreadyWhitelisted` - bad list
pub fn manage(ctx: Context<ManageWhitelist>, takers: Vec<Pubkey>) -> Result<()> {
    let maker = ctx.accounts.maker.key();
    let offer_key = ctx.accounts.offer.key();
    ctx.accounts.offer.ensure_ongoing()?;

    let whitelist = &mut ctx.accounts.whitelist;
    whitelist.bind(maker, offer_key, ctx.bumps.whitelist)?;
    whitelist.replace(takers)?;

    msg!("Offer {} whitelist replaced: {} takers", ctx.accounts.offer.offer_id, whitelist.takers.len());
    emit_taker_update(&ctx.accounts.offer, offer_key, &whitelist.takers)
}

/// Append takers to an existing whitelist.
pub fn add_takers(ctx: Context<UpdateTakers>, takers: Vec<Pubkey>) -> Result<()> {
    let offer_key = ctx.accounts.offer.key();
    ctx.accounts.offer.ensure_ongoing()?;

    let whitelist = &mut ctx.accounts.whitelist;
    whitelist.ensure_bound_to(&ctx.accounts.maker.key(), &offer_key)?;
    whitelist.add(&takers)?;

    msg!("Offer {} whitelist: added {}, now {}", ctx.accounts.offer.offer_id, takers.len(), whitelist.takers.len());
    emit_taker_update(&ctx.accounts.offer, offer_key, &whitelist.takers)
}

/// Remove takers from an existing whitelist.
pub fn remove_takers(ctx: Context<UpdateTakers>, takers: Vec<Pubkey>) -> Result<()> {
    let offer_key = ctx.accounts.offer.key();
    ctx.accounts.offer.ensure_ongoing()?;

    let whitelist = &mut ctx.accounts.whitelist;
    whitelist.ensure_bound_to(&ctx.accounts.maker.key(), &offer_key)?;
    whitelist.remove(&takers)?;

    msg!("Offer {} whitelist: removed {}, now {}", ctx.accounts.offer.offer_id, takers.len(), whitelist.takers.len());
    emit_taker_update(&ctx.accounts.offer, offer_key, &whitelist.takers)
}

fn emit_taker_update(offer: &Offer, offer_key: Pubkey, takers: &[Pubkey]) -> Result<()> {
    emit!(TakerUpdated {
        offer: offer_key,
        offer_id: offer.offer_id,
        maker: offer.maker,
        takers: takers.to_vec(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct ManageWhitelist<'info> {
    /// Offer maker; pays rent for the whitelist on first use
    #[account(mut)]
    pub maker: Signer<'info>,

    #[account(
        constraint = offer.maker == maker.key() @ SwapError::UnauthorizedMaker,
        seeds = [OFFER_SEED, offer.maker.as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump = offer.bump
    )]
    pub offer: Account<'info, Offer>,

    #[account(
        init_if_needed,
        payer = maker,
        space = TakerWhitelist::SPACE,
        seeds = [TAKER_WHITELIST_SEED, maker.key().as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump
    )]
    pub whitelist: Account<'info, TakerWhitelist>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateTakers<'info> {
    pub maker: Signer<'info>,

    #[account(
        constraint = offer.maker == maker.key() @ SwapError::UnauthorizedMaker,
        seeds = [OFFER_SEED, offer.maker.as_ref(), offer.offer_id.to_le_bytes().as_ref()],
        bump = offer.bump
    )]
    pub offer: Account<'info, Offer>,

    #[account(
        mut,
        constraint = whitelist.maker == maker.key() @ SwapError::InvalidMaker,
        constraint = whitelist.offer == offer.key() @ SwapError::InvalidMaker
    )]
    pub whitelist: Account<'info, TakerWhitelist>,
}
