//! Transaction model and its wire serialization.

mod out_point;
#[allow(clippy::module_inception)]
mod tx;
mod tx_in;
mod tx_out;
mod witness;

pub use self::out_point::OutPoint;
pub use self::tx::{Tx, WITNESS_SCALE_FACTOR};
pub use self::tx_in::{SEQUENCE_FINAL, SEQUENCE_RBF, TxIn};
pub use self::tx_out::{MAX_SATOSHIS, TxOut};
pub use self::witness::Witness;
