pub mod commands;
pub mod page;
pub mod types;

pub use commands::ShareCommand;
pub use page::{Navigator, PageView};
pub use types::{ReferralCode, StatsSnapshot};
