use anchor_lang::prelude::*;
use crate::constants::MAX_TAKERS;
use crate::errors::SwapError;

/// Addresses allowed to fill one offer. Lives and dies with its offer.
/// PDA: [b"whitelist", maker.key(), offer_id.to_le_bytes()]
#[account]
pub struct TakerWhitelist {
    /// Maker who controls this list
    pub maker: Pubkey,

    /// Offer this list belongs to
    pub offer: Pubkey,

    /// Unique, at most MAX_TAKERS entries
    pub takers: Vec<Pubkey>,

    pub bump: u8,
}

impl TakerWhitelist {
    pub const SPACE: usize = 8 + // discriminator
        32 + // maker
        32 + // offer
        4 + (32 * MAX_TAKERS) + // takers
        1; // bump

    /// Binds a freshly created list to its offer, or checks an existing binding.
    pub fn bind(&mut self, maker: Pubkey, offer: Pubkey, bump: u8) -> Result<()> {
        if self.offer == Pubkey::default() {
            self.maker = maker;
            self.offer = offer;
            self.bump = bump;
            return Ok(());
        }
        self.ensure_bound_to(&maker, &offer)
    }

    pub fn ensure_bound_to(&self, maker: &Pubkey, offer: &Pubkey) -> Result<()> {
        require_keys_eq!(self.maker, *maker, SwapError::InvalidMaker);
        require_keys_eq!(self.offer, *offer, SwapError::InvalidMaker);
        Ok(())
    }

    pub fn ensure_contains(&self, taker: &Pubkey) -> Result<()> {
        require!(self.takers.contains(taker), SwapError::TakerNotWhitelisted);
        Ok(())
    }

    /// Replaces the whole list.
    pub fn replace(&mut self, takers: Vec<Pubkey>) -> Result<()> {
        require!(!takers.is_empty(), SwapError::EmptyTakersList);
        require!(takers.len() <= MAX_TAKERS, SwapError::WhitelistFull);
        for (i, taker) in takers.iter().enumerate() {
            require!(!takers[..i].contains(taker), SwapError::TakerAlreadyWhitelisted);
        }

        self.takers = takers;
        Ok(())
    }

    /// Appends every taker or none of them.
    pub fn add(&mut self, new_takers: &[Pubkey]) -> Result<()> {
        require!(!new_takers.is_empty(), SwapError::EmptyTakersList);
        require!(self.takers.len() + new_takers.len() <= MAX_TAKERS, SwapError::WhitelistFull);

        let mut takers = self.takers.clone();
        for taker in new_takers {
            require!(!takers.contains(taker), SwapError::TakerAlreadyWhitelisted);
            takers.push(*taker);
        }

        self.takers = takers;
        Ok(())
    }

    /// Removes every taker or none of them.
    pub fn remove(&mut self, remove_takers: &[Pubkey]) -> Result<()> {
        require!(!remove_takers.is_empty(), SwapError::EmptyTakersList);

        let mut takers = self.takers.clone();
        for taker in remove_takers {
            let position = takers
                .iter()
                .position(|t| t == taker)
                .ok_or(SwapError::TakerNotWhitelisted)?;
            takers.remove(position);
        }

        self.takers = takers;
        Ok(())
    }
}
