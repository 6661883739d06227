use anchor_lang::prelude::*;
use anchor_spl::token::{transfer, Mint, Token, TokenAccount, Transfer};
use crate::constants::*;
use crate::errors::SwapError;
use crate::events::OfferCreated;
use crate::state::*;
use crate::types::OfferStatus;
use crate::utils::accounts::{load_required, store};

/// Create an offer and lock the maker's input tokens in its vault.
///
/// Flow:
/// 1. Validate amount, deadline and (if required) both mints against the whitelist
/// 2. Create the offer PDA and its vault (vault authority = offer PDA)
/// 3. Snapshot the current fee terms into the offer
/// 4. Transfer `token_amount` from the maker into the vault
/// 5. Offer becomes Ongoing; emit OfferCreated
pub fn create(
    ctx: Context<CreateOffer>,
    offer_id: u64,
    token_amount: u64,
    expected_total_amount: u64,
    deadline: i64,
) -> Result<()> {
    let clock = Clock::get()?;

    Offer::validate_terms(token_amount, deadline, clock.unix_timestamp)?;
    let fee_config: FeeConfig =
        load_required(&ctx.accounts.fee_config, SwapError::FeeConfigNotInitialized)?;
    fee_config.ensure_initialized()?;
    let whitelist_config: WhitelistConfig =
        load_required(&ctx.accounts.whitelist_config, SwapError::AdminNotInitialized)?;
    let mint_whitelist: MintWhitelist =
        load_required(&ctx.accounts.mint_whitelist, SwapError::AdminNotInitialized)?;
    let mut protocol_stats: ProtocolStats =
        load_required(&ctx.accounts.protocol_stats, SwapError::AdminNotInitialized)?;

    let input_mint = ctx.accounts.input_token_mint.key();
    let output_mint = ctx.accounts.output_token_mint.key();
    mint_whitelist.ensure_tradable(whitelist_config.require_whitelist, &input_mint, &output_mint)?;
    require!(
        ctx.accounts.maker_token_account.amount >= token_amount,
        SwapError::InsufficientAmount
    );

    let maker = ctx.accounts.maker.key();
    let offer_key = ctx.accounts.offer.key();
    let vault_key = ctx.accounts.vault.key();
    let fee_percentage = fee_config.fee_percentage;
    let fee_wallet = fee_config.fee_address;

    let offer = &mut ctx.accounts.offer;
    offer.offer_id = offer_id;
    offer.maker = maker;
    offer.input_token_mint = input_mint;
    offer.output_token_mint = output_mint;
    offer.initial_amount = token_amount;
    offer.expected_total_amount = expected_total_amount;
    offer.remaining_amount = token_amount;
    offer.fulfilled_output_amount = 0;
    offer.deadline = deadline;
    offer.status = OfferStatus::Initialized;
    offer.fee_percentage = fee_percentage;
    offer.fee_wallet = fee_wallet;
    offer.vault = vault_key;
    offer.created_at = clock.unix_timestamp;
    offer.updated_at = clock.unix_timestamp;
    offer.bump = ctx.bumps.offer;

    // Vault was created by the account constraints above
    offer.transition(OfferStatus::VaultReady)?;

    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.maker_token_account.to_account_info(),
            to: ctx.accounts.vault.to_account_info(),
            authority: ctx.accounts.maker.to_account_info(),
        },
    );
    transfer(transfer_ctx, token_amount)?;

    ctx.accounts.offer.transition(OfferStatus::Ongoing)?;
    protocol_stats.record_created()?;
    store(&protocol_stats, &ctx.accounts.protocol_stats)?;

    msg!(
        "Offer {} created: maker {} locked {} of {} for {} of {}",
        offer_id,
        maker,
        token_amount,
        input_mint,
        expected_total_amount,
        output_mint
    );

    emit!(OfferCreated {
        offer: offer_key,
        offer_id,
        maker,
        input_token_mint: input_mint,
        output_token_mint: output_mint,
        token_amount,
        expected_amount: expected_total_amount,
        deadline,
        fee_percentage,
        fee_wallet,
        vault: vault_key,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(offer_id: u64)]
pub struct CreateOffer<'info> {
    /// Maker; pays rent for the offer and vault
    #[account(mut)]
    pub maker: Signer<'info>,

    #[account(
        init,
        payer = maker,
        space = Offer::SPACE,
        seeds = [OFFER_SEED, maker.key().as_ref(), offer_id.to_le_bytes().as_ref()],
        bump
    )]
    pub offer: Box<Account<'info, Offer>>,

    /// CHECK: Fee record PDA, loaded in the handler
    #[account(seeds = [FEE_CONFIG_SEED], bump)]
    pub fee_config: UncheckedAccount<'info>,

    /// CHECK: Whitelist policy PDA, loaded in the handler
    #[account(seeds = [WHITELIST_CONFIG_SEED], bump)]
    pub whitelist_config: UncheckedAccount<'info>,

    /// CHECK: Mint whitelist PDA, loaded in the handler
    #[account(seeds = [MINT_WHITELIST_SEED], bump)]
    pub mint_whitelist: UncheckedAccount<'info>,

    /// CHECK: Protocol stats PDA, loaded and stored in the handler
    #[account(mut, seeds = [PROTOCOL_STATS_SEED], bump)]
    pub protocol_stats: UncheckedAccount<'info>,

    pub input_token_mint: Box<Account<'info, Mint>>,

    pub output_token_mint: Box<Account<'info, Mint>>,

    /// Source of the escrowed tokens
    #[account(
        mut,
        constraint = maker_token_account.owner == maker.key() @ SwapError::InvalidTokenAccount,
        constraint = maker_token_account.mint == input_token_mint.key() @ SwapError::InvalidTokenMint
    )]
    pub maker_token_account: Box<Account<'info, TokenAccount>>,

    /// Escrow vault; only the offer PDA can move these tokens
    #[account(
        init,
        payer = maker,
        token::mint = input_token_mint,
        token::authority = offer,
        seeds = [VAULT_SEED, offer.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
