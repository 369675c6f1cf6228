use anchor_lang::prelude::*;

/// Callback surface of custodian accounts. After a transfer credits a
/// custodian's holding, the engine notifies the custodian and requires
/// acceptance; a `false` return aborts with `CustodianRejected`.
pub trait CustodianReceiver {
    fn receive_transfer(
        &mut self,
        custodian: &Pubkey,
        beneficiary: &Pubkey,
        value: u64,
    ) -> Result<bool>;
}

/// Accepts every incoming transfer. Used when custodians have no in-process
/// callback attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptingCustodian;

impl CustodianReceiver for AcceptingCustodian {
    fn receive_transfer(
        &mut self,
        _custodian: &Pubkey,
        _beneficiary: &Pubkey,
        _value: u64,
    ) -> Result<bool> {
        Ok(true)
    }
}
