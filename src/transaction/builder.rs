//! Assembly of the unsigned one-input, one-output spending transaction.
use crate::script::Script;
use crate::tx::{OutPoint, SEQUENCE_RBF, Tx, TxIn, TxOut};
use crate::util::{Error, Result};
use log::debug;

/// Default transaction version (enables BIP68 relative locks).
pub const DEFAULT_VERSION: u32 = 2;
/// Default sequence: replaceable, no relative lock.
pub const DEFAULT_SEQUENCE: u32 = SEQUENCE_RBF;

/// The output being spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorOutput {
    /// Location of the output.
    pub outpoint: OutPoint,
    /// Value of the output in satoshis.
    pub satoshis: u64,
}

/// How much of the prior output reaches the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendAmount {
    /// Send exactly this many satoshis; the remainder is the fee.
    Exact(u64),
    /// Send everything except this fee.
    AllLessFee(u64),
}

/// Unsigned transaction together with the value it spends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedSpend {
    /// Transaction with an empty scriptSig and no witness.
    pub tx: Tx,
    /// The output the single input spends.
    pub prior: PriorOutput,
    /// Implicit fee: prior value minus the output value.
    pub fee: u64,
}

/// Builder for the spending transaction.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    prior: PriorOutput,
    destination: Script,
    amount: SendAmount,
    version: u32,
    sequence: u32,
    lock_time: u32,
}

impl TxBuilder {
    /// Starts a builder with version 2, sequence `0xfffffffd` and lock time 0.
    pub fn new(prior: PriorOutput, destination: Script, amount: SendAmount) -> Self {
        Self {
            prior,
            destination,
            amount,
            version: DEFAULT_VERSION,
            sequence: DEFAULT_SEQUENCE,
            lock_time: 0,
        }
    }

    /// Sets the transaction version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Any value is accepted. `0xfffffffd` and below signal replace-by-fee,
    /// `0xffffffff` marks the input final.
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sets the absolute lock time (block height or timestamp).
    pub fn with_lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    /// Value reaching the destination.
    ///
    /// # Errors
    /// `Error::InsufficientFunds` if it would be zero, or if the fee would be negative.
    pub fn send_amount(&self) -> Result<u64> {
        let available = self.prior.satoshis;
        let send = match self.amount {
            SendAmount::Exact(amount) if amount > available => {
                return Err(Error::InsufficientFunds {
                    available,
                    requested: amount,
                });
            }
            SendAmount::Exact(amount) => amount,
            SendAmount::AllLessFee(fee) => available.checked_sub(fee).ok_or(Error::InsufficientFunds {
                available,
                requested: fee,
            })?,
        };
        if send == 0 {
            return Err(Error::InsufficientFunds {
                available,
                requested: available,
            });
        }
        Ok(send)
    }

    /// Builds the unsigned transaction.
    pub fn build(self) -> Result<UnsignedSpend> {
        if self.destination.is_empty() {
            return Err(Error::BadArgument("Destination script is empty".to_string()));
        }
        let send = self.send_amount()?;
        let fee = self.prior.satoshis - send;
        let output = TxOut {
            satoshis: send,
            lock_script: self.destination,
        };
        output.validate()?;
        debug!(
            "spending {} ({} sats): send {} sats, fee {} sats",
            self.prior.outpoint, self.prior.satoshis, send, fee
        );
        let tx = Tx {
            version: self.version,
            inputs: vec![TxIn::new(self.prior.outpoint, self.sequence)],
            outputs: vec![output],
            lock_time: self.lock_time,
        };
        Ok(UnsignedSpend {
            tx,
            prior: self.prior,
            fee,
        })
    }
}
