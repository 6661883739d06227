use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::SwapError;
use crate::events::*;
use crate::state::*;
use crate::utils::accounts::{load_required, store};

/// Initializes every protocol singleton in one instruction.
///
/// The accounts use `init_if_needed` so that a second call reaches the
/// handler and fails with `AlreadyInitialized` instead of a runtime error.
///
/// # Errors
/// * `AlreadyInitialized` - the admin record already exists
/// * `InvalidFeePercentage` - fee above 10_000 bps
/// * `InvalidAddress` - zero fee wallet
/// * `TooManyMints` - more than MAX_WHITELISTED_MINTS initial mints
/// * `MintAlreadyWhitelisted` - duplicate initial mints
pub fn initialize(
    ctx: Context<Initialize>,
    fee_percentage: u64,
    fee_wallet: Pubkey,
    require_whitelist: bool,
    initial_mints: Vec<Pubkey>,
) -> Result<()> {
    ctx.accounts.admin_config.ensure_uninitialized()?;
    FeeConfig::validate_fee_percentage(fee_percentage)?;
    FeeConfig::validate_fee_address(&fee_wallet)?;
    require!(initial_mints.len() <= MAX_WHITELISTED_MINTS, SwapError::TooManyMints);

    let admin = ctx.accounts.admin.key();
    let clock = Clock::get()?;

    let admin_config = &mut ctx.accounts.admin_config;
    admin_config.admin = admin;
    admin_config.is_initialized = true;
    admin_config.bump = ctx.bumps.admin_config;

    let fee_config = &mut ctx.accounts.fee_config;
    fee_config.fee_percentage = fee_percentage;
    fee_config.fee_address = fee_wallet;
    fee_config.bump = ctx.bumps.fee_config;

    let whitelist_config = &mut ctx.accounts.whitelist_config;
    whitelist_config.require_whitelist = require_whitelist;
    whitelist_config.bump = ctx.bumps.whitelist_config;

    let mint_whitelist = &mut ctx.accounts.mint_whitelist;
    mint_whitelist.mints = Vec::new();
    mint_whitelist.add(&initial_mints)?;
    mint_whitelist.bump = ctx.bumps.mint_whitelist;

    let protocol_stats = &mut ctx.accounts.protocol_stats;
    protocol_stats.bump = ctx.bumps.protocol_stats;

    msg!(
        "Protocol initialized: admin {}, fee {} bps to {}, whitelist required: {}",
        admin,
        fee_percentage,
        fee_wallet,
        require_whitelist
    );

    emit!(AdminInitialized {
        admin,
        fee_percentage,
        fee_wallet,
        require_whitelist,
        initial_mints,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

/// Loads the admin record and checks the signer against it.
/// Fails `AdminNotInitialized` before `initialize_admin` has run.
pub(crate) fn authorize_admin(admin_config: &AccountInfo, admin: &Signer) -> Result<()> {
    let config: AdminConfig = load_required(admin_config, SwapError::AdminNotInitialized)?;
    config.authorize(&admin.key())
}

pub fn add_mints(ctx: Context<ModifyMintWhitelist>, new_mints: Vec<Pubkey>) -> Result<()> {
    authorize_admin(&ctx.accounts.admin_config, &ctx.accounts.admin)?;

    let mut mint_whitelist: MintWhitelist =
        load_required(&ctx.accounts.mint_whitelist, SwapError::AdminNotInitialized)?;
    mint_whitelist.add(&new_mints)?;
    store(&mint_whitelist, &ctx.accounts.mint_whitelist)?;
    msg!("Whitelisted {} mints, {} total", new_mints.len(), mint_whitelist.mints.len());

    emit!(MintsAddedToWhitelist {
        admin: ctx.accounts.admin.key(),
        new_mints,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn remove_mints(ctx: Context<ModifyMintWhitelist>, remove_mints: Vec<Pubkey>) -> Result<()> {
    authorize_admin(&ctx.accounts.admin_config, &ctx.accounts.admin)?;

    let mut mint_whitelist: MintWhitelist =
        load_required(&ctx.accounts.mint_whitelist, SwapError::AdminNotInitialized)?;
    mint_whitelist.remove(&remove_mints)?;
    store(&mint_whitelist, &ctx.accounts.mint_whitelist)?;
    msg!("Removed {} mints, {} left", remove_mints.len(), mint_whitelist.mints.len());

    emit!(MintsRemovedFromWhitelist {
        admin: ctx.accounts.admin.key(),
        removed_mints: remove_mints,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Only affects offers created afterwards; open offers keep their snapshot.
pub fn fee_update(ctx: Context<UpdateFee>, new_fee: u64) -> Result<()> {
    authorize_admin(&ctx.accounts.admin_config, &ctx.accounts.admin)?;

    let mut fee_config: FeeConfig =
        load_required(&ctx.accounts.fee_config, SwapError::FeeConfigNotInitialized)?;
    let old_fee = fee_config.set_fee_percentage(new_fee)?;
    store(&fee_config, &ctx.accounts.fee_config)?;
    msg!("Fee updated: {} -> {} bps", old_fee, new_fee);

    emit!(FeeUpdated {
        admin: ctx.accounts.admin.key(),
        old_fee,
        new_fee,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn fee_address_update(ctx: Context<UpdateFee>, new_address: Pubkey) -> Result<()> {
    authorize_admin(&ctx.accounts.admin_config, &ctx.accounts.admin)?;

    let mut fee_config: FeeConfig =
        load_required(&ctx.accounts.fee_config, SwapError::FeeConfigNotInitialized)?;
    let old_wallet = fee_config.set_fee_address(new_address)?;
    store(&fee_config, &ctx.accounts.fee_config)?;
    msg!("Fee wallet updated: {} -> {}", old_wallet, new_address);

    emit!(FeeWalletUpdated {
        admin: ctx.accounts.admin.key(),
        old_wallet,
        new_wallet: new_address,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn toggle_whitelist(ctx: Context<ToggleRequireWhitelist>) -> Result<()> {
    authorize_admin(&ctx.accounts.admin_config, &ctx.accounts.admin)?;

    let mut whitelist_config: WhitelistConfig =
        load_required(&ctx.accounts.whitelist_config, SwapError::AdminNotInitialized)?;
    let new_status = whitelist_config.toggle();
    store(&whitelist_config, &ctx.accounts.whitelist_config)?;
    msg!("Mint whitelist required: {}", new_status);

    emit!(WhitelistRequirementToggled {
        admin: ctx.accounts.admin.key(),
        new_status,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Becomes the protocol admin; pays rent for all singletons
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init_if_needed,
        payer = admin,
        space = AdminConfig::SPACE,
        seeds = [ADMIN_CONFIG_SEED],
        bump
    )]
    pub admin_config: Account<'info, AdminConfig>,

    #[account(
        init_if_needed,
        payer = admin,
        space = FeeConfig::SPACE,
        seeds = [FEE_CONFIG_SEED],
        bump
    )]
    pub fee_config: Account<'info, FeeConfig>,

    #[account(
        init_if_needed,
        payer = admin,
        space = WhitelistConfig::SPACE,
        seeds = [WHITELIST_CONFIG_SEED],
        bump
    )]
    pub whitelist_config: Account<'info, WhitelistConfig>,

    #[account(
        init_if_needed,
        payer = admin,
        space = MintWhitelist::SPACE,
        seeds = [MINT_WHITELIST_SEED],
        bump
    )]
    pub mint_whitelist: Account<'info, MintWhitelist>,

    #[account(
        init_if_needed,
        payer = admin,
        space = ProtocolStats::SPACE,
        seeds = [PROTOCOL_STATS_SEED],
        bump
    )]
    pub protocol_stats: Account<'info, ProtocolStats>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ModifyMintWhitelist<'info> {
    pub admin: Signer<'info>,

    /// CHECK: Admin record PDA, loaded in the handler
    #[account(seeds = [ADMIN_CONFIG_SEED], bump)]
    pub admin_config: UncheckedAccount<'info>,

    /// CHECK: Mint whitelist PDA, loaded and stored in the handler
    #[account(mut, seeds = [MINT_WHITELIST_SEED], bump)]
    pub mint_whitelist: UncheckedAccount<'info>,
}

/// Shared by fee percentage and fee wallet updates
#[derive(Accounts)]
pub struct UpdateFee<'info> {
    pub admin: Signer<'info>,

    /// CHECK: Admin record PDA, loaded in the handler
    #[account(seeds = [ADMIN_CONFIG_SEED], bump)]
    pub admin_config: UncheckedAccount<'info>,

    /// CHECK: Fee record PDA, loaded and stored in the handler
    #[account(mut, seeds = [FEE_CONFIG_SEED], bump)]
    pub fee_config: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct ToggleRequireWhitelist<'info> {
    pub admin: Signer<'info>,

    /// CHECK: Admin record PDA, loaded in the handler
    #[account(seeds = [ADMIN_CONFIG_SEED], bump)]
    pub admin_config: UncheckedAccount<'info>,

    /// CHECK: Whitelist policy PDA, loaded and stored in the handler
    #[account(mut, seeds = [WHITELIST_CONFIG_SEED], bump)]
    pub whitelist_config: UncheckedAccount<'info>,
}
