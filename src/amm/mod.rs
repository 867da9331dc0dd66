pub mod types;
pub mod asset;
pub mod guardrails;
pub mod tax;
pub mod pricing;
pub mod pool;
pub mod swap;
pub mod liquidity;
pub mod reference;

// módulos unificados de erro
pub mod error_catalog;
pub mod error;
pub mod error_map;

pub use asset::{Asset, AssetInfo};
pub use error::{AmmError, Result};
pub use error_catalog::AmmErrorCode;
pub use liquidity::{provide_assets, provide_liquidity, withdraw_liquidity, LiquidityReceipt, WithdrawReceipt};
pub use pool::{FeeSchedule, Pool};
pub use swap::{reverse_simulate, simulate, swap, ReverseQuote, SwapLimits, SwapQuote};
pub use tax::TaxPolicy;
pub use types::{Decimal, Ppm, Wad, U256};
