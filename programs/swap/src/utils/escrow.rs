use anchor_lang::prelude::*;
use anchor_spl::token::{close_account, transfer, CloseAccount, Token, TokenAccount, Transfer};
use crate::constants::OFFER_SEED;
use crate::state::{Offer, TakerWhitelist};
use crate::utils::accounts::{close_program_account, load_optional};

/// Moves `amount` out of the vault, signed by the offer PDA (the vault authority).
pub fn release_from_vault<'info>(
    offer: &Account<'info, Offer>,
    vault: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let maker = offer.maker;
    let offer_id_le = offer.offer_id.to_le_bytes();
    let offer_bump = offer.bump;
    let seeds = &[
        OFFER_SEED,
        maker.as_ref(),
        offer_id_le.as_ref(),
        &[offer_bump],
    ];
    let signer = &[&seeds[..]];

    let cpi_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        Transfer {
            from: vault.to_account_info(),
            to: destination.to_account_info(),
            authority: offer.to_account_info(),
        },
        signer,
    );
    transfer(cpi_ctx, amount)?;

    msg!("Released {} tokens from vault {}", amount, vault.key());
    Ok(())
}

/// Reads the offer's taker whitelist, `None` if the maker never created one.
/// An existing list must be bound to this offer.
pub fn load_taker_whitelist(
    offer: &Account<Offer>,
    whitelist: &AccountInfo,
) -> Result<Option<TakerWhitelist>> {
    let list = load_optional::<TakerWhitelist>(whitelist)?;
    if let Some(list) = &list {
        list.ensure_bound_to(&offer.maker, &offer.key())?;
    }
    Ok(list)
}

/// Terminal settlement of an offer's escrow, run in the same instruction as
/// the terminal status change.
///
/// Whatever the vault holds at this point (the unfilled remainder plus any
/// tokens sent to it directly) goes to `refund_destination`, then the empty
/// vault and the taker whitelist, if it exists, are closed with rent going to
/// the maker. Returns the swept amount.
pub fn close_escrow_accounts<'info>(
    offer: &Account<'info, Offer>,
    vault: &mut Account<'info, TokenAccount>,
    refund_destination: &Account<'info, TokenAccount>,
    whitelist: &AccountInfo<'info>,
    maker: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
) -> Result<u64> {
    vault.reload()?;
    let swept = vault.amount;
    release_from_vault(offer, vault, refund_destination, token_program, swept)?;

    let offer_maker = offer.maker;
    let offer_id_le = offer.offer_id.to_le_bytes();
    let offer_bump = offer.bump;
    let seeds = &[
        OFFER_SEED,
        offer_maker.as_ref(),
        offer_id_le.as_ref(),
        &[offer_bump],
    ];
    let signer = &[&seeds[..]];

    let close_vault_accounts = CloseAccount {
        account: vault.to_account_info(),
        destination: maker.clone(),
        authority: offer.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        close_vault_accounts,
        signer,
    );
    close_account(cpi_ctx)?;
    msg!("Vault closed, rent returned to maker");

    if load_taker_whitelist(offer, whitelist)?.is_some() {
        close_program_account(whitelist, maker)?;
        msg!("Taker whitelist closed, rent returned to maker");
    }

    Ok(swept)
}
