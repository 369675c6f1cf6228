pub mod compliance;
pub mod custody;
pub mod policy;

pub use compliance::*;
pub use custody::*;
pub use policy::*;

/// Collaborator bundle handed to every engine entry point: the compliance
/// oracle, the policy hook registry, the custodian callback surface, and the
/// host clock reading for this operation. Bundling them keeps engine
/// signatures stable while the instruction layer decides which concrete
/// implementations are attached.
pub struct LedgerEnv<'a> {
    pub oracle: &'a mut dyn ComplianceOracle,
    pub hooks: &'a mut dyn PolicyHooks,
    pub custodians: &'a mut dyn CustodianReceiver,
    pub now: i64,
}
