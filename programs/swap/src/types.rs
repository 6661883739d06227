use anchor_lang::prelude::*;

/// Offer lifecycle.
///
/// `Initialized -> VaultReady -> Ongoing -> {Completed | Cancelled | Expired}`.
/// Terminal states never transition again.
#[repr(u8)]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfferStatus {
    Initialized = 0,
    VaultReady  = 1,
    Ongoing     = 2,
    Completed   = 3,
    Cancelled   = 4,
    Expired     = 5,
}

impl OfferStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferStatus::Completed | OfferStatus::Cancelled | OfferStatus::Expired)
    }

    /// The single source of truth for legal status changes.
    pub fn can_transition_to(&self, next: OfferStatus) -> bool {
        use OfferStatus::*;
        matches!(
            (self, next),
            (Initialized, VaultReady)
                | (VaultReady, Ongoing)
                | (Ongoing, Completed)
                | (Ongoing, Cancelled)
                | (Ongoing, Expired)
        )
    }
}

#[repr(u8)]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancellationReason {
    Expired        = 0,
    MakerCancelled = 1,
}
