/// Index-space constants. Token indices are 48-bit; index 0 is the null
/// pointer sentinel, so the highest allocatable index is 2^48 - 2.
pub const MAX_UPPER_BOUND: u64 = (1 << 48) - 2;
pub const MAX_VALUE: u64 = (1 << 48) - 1;

/// Branching factor of the pointer grid's skip levels.
pub const GRID_BASE: u64 = 16;

/// Party indices into the oracle's two-sided arrays.
pub const SENDER: usize = 0;
pub const RECEIVER: usize = 1;

/// Account space. The ledger grows with the range set; `initialize_ledger`
/// allocates the CPI maximum and `resize_ledger` grows it from there.
pub const INITIAL_LEDGER_SPACE: usize = 10_240;
pub const REGISTRY_SPACE: usize = 10_240;

/// PDA seed constants
pub const LEDGER_SEED: &[u8] = b"ledger";
pub const REGISTRY_SEED: &[u8] = b"registry";
