use anchor_lang::prelude::*;
use anchor_lang::system_program;
use crate::errors::SwapError;

/// Reads a program-owned account that lives at a fixed PDA.
/// Returns `None` while the PDA was never created (system-owned or empty).
pub fn load_optional<T: AccountDeserialize>(info: &AccountInfo) -> Result<Option<T>> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(None);
    }
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..]).map(Some)
}

/// Like `load_optional`, failing with `missing` when the account does not exist.
pub fn load_required<T: AccountDeserialize>(info: &AccountInfo, missing: SwapError) -> Result<T> {
    match load_optional(info)? {
        Some(account) => Ok(account),
        None => Err(error!(missing)),
    }
}

/// Writes `account` back into a program-owned account loaded with `load_*`.
pub fn store<T: AccountSerialize>(account: &T, info: &AccountInfo) -> Result<()> {
    require_keys_eq!(*info.owner, crate::ID, SwapError::InvalidAddress);
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    account.try_serialize(&mut writer)
}

/// Drains a program-owned account's lamports into `destination` and hands it
/// back to the system program.
pub fn close_program_account<'info>(
    info: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    let lamports = info.lamports();
    let balance = destination
        .lamports()
        .checked_add(lamports)
        .ok_or(SwapError::CalculationError)?;
    **destination.try_borrow_mut_lamports()? = balance;
    **info.try_borrow_mut_lamports()? = 0;

    info.assign(&system_program::ID);
    info.realloc(0, false)?;
    Ok(())
}
