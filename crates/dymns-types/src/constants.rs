//! System-wide constants for the DymNS marketplace.

/// Module name, also the seed of the module escrow account.
pub const MODULE_NAME: &str = "dymns";

/// Buy-order ID prefix for orders placed against a Dym-Name.
pub const BUY_ORDER_ID_PREFIX_DYM_NAME: &str = "10";

/// Buy-order ID prefix for orders placed against an Alias.
pub const BUY_ORDER_ID_PREFIX_ALIAS: &str = "20";

/// Length of every buy-order ID prefix.
pub const BUY_ORDER_ID_PREFIX_LEN: usize = 2;

/// Maximum length of a Dym-Name.
pub const MAX_DYM_NAME_LENGTH: usize = 20;

/// Maximum length of an Alias.
pub const MAX_ALIAS_LENGTH: usize = 10;

/// Maximum length of a chain-id accepted in configuration.
pub const MAX_CHAIN_ID_LENGTH: usize = 48;

/// Maximum length of the contact field of a Dym-Name.
pub const MAX_DYM_NAME_CONTACT_LENGTH: usize = 140;

/// Default price denomination.
pub const DEFAULT_PRICE_DENOM: &str = "adym";

/// Default minimum offer price: 10 DYM expressed in `adym` (18 decimals).
pub const DEFAULT_MIN_OFFER_PRICE: u64 = 10_000_000_000_000_000_000;

/// Default window before expiry in which a Dym-Name cannot be traded (30 days).
pub const DEFAULT_PROHIBIT_SELL_DURATION_SECS: i64 = 30 * 24 * 60 * 60;

/// Default grace period after expiry (30 days).
pub const DEFAULT_GRACE_PERIOD_SECS: i64 = 30 * 24 * 60 * 60;

/// Minimum accepted grace period (30 days).
pub const MIN_GRACE_PERIOD_SECS: i64 = 30 * 24 * 60 * 60;

/// Address byte lengths accepted by the address codec.
pub const ADDRESS_LENGTHS: [usize; 2] = [20, 32];

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
