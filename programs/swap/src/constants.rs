// PDA seeds
pub const ADMIN_CONFIG_SEED:     &[u8] = b"admin_config";
pub const FEE_CONFIG_SEED:       &[u8] = b"fee";
pub const WHITELIST_CONFIG_SEED: &[u8] = b"whitelist_config";
pub const MINT_WHITELIST_SEED:   &[u8] = b"mint_whitelist";
pub const PROTOCOL_STATS_SEED:   &[u8] = b"protocol_stats";
pub const OFFER_SEED:            &[u8] = b"offer";
pub const TAKER_WHITELIST_SEED:  &[u8] = b"whitelist";
pub const VAULT_SEED:            &[u8] = b"vault";

// Capacity limits (account space is sized against these)
pub const MAX_WHITELISTED_MINTS: usize = 50;
pub const MAX_TAKERS: usize = 50;

// Fees are expressed in basis points; 10_000 bps = 100%
pub const BPS_DENOMINATOR: u64 = 10_000;
