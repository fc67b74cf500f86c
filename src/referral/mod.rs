pub mod capture;
pub mod controller;
pub mod notify;
pub mod poller;
pub mod share;

pub use controller::{ControllerSettings, ReferralController};
