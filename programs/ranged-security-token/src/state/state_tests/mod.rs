//! Test harness for the range-ledger engine.
//!
//! The suites are split by subsystem and mirror the invariants each one
//! carries:
//! - `grid_tests`: pointer-grid marking and probe resolution.
//! - `ledger_tests`: mint/burn/modify flows plus the tiling and balance
//!   identities every mutation must preserve.
//! - `transfer_tests`: planner selection, the four commit alignments,
//!   custodian accounting, policy/oracle interaction, and event sequences.
//! - `helpers`: deterministic fixtures, scripted collaborators, and the
//!   structural audit shared by all suites.

pub mod grid_tests;
pub mod helpers;
pub mod ledger_tests;
pub mod transfer_tests;
