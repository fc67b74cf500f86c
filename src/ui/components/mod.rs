pub mod banner;
pub mod bulk_dialog;
pub mod share_bar;
pub mod stats_panel;
pub mod toasts;
