pub mod approve;
pub mod burn;
pub mod initialize_ledger;
pub mod mint;
pub mod modify_range;
pub mod modify_ranges;
pub mod resize_ledger;
pub mod set_member;
pub mod transfer;
pub mod transfer_custodian;
pub mod transfer_from;
pub mod transfer_range;

pub use approve::*;
pub use burn::*;
pub use initialize_ledger::*;
pub use mint::*;
pub use modify_range::*;
pub use modify_ranges::*;
pub use resize_ledger::*;
pub use set_member::*;
pub use transfer::*;
pub use transfer_custodian::*;
pub use transfer_from::*;
pub use transfer_range::*;
