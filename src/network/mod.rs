pub mod api;
pub mod cookies;

pub use api::{HttpReferralApi, ReferralApi};
