// Message types - what the routing layer delivers for execution

use crate::account::Address;
use crate::coin::{Coins, Denom};
use crate::keeper::{Input, KeeperError, Output};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from message validation and execution
#[derive(Error, Debug)]
pub enum MsgError {
    #[error("Send message has no inputs")]
    EmptyInputs,

    #[error("Send message has no outputs")]
    EmptyOutputs,

    #[error("Transfer leg for {address} has empty coins")]
    EmptyLeg { address: Address },

    #[error("Sum of inputs does not equal sum of outputs")]
    InputOutputMismatch,

    #[error("Amount overflow while summing denomination {denom}")]
    SumOverflow { denom: Denom },

    #[error("No invariant registered under route '{route}'")]
    UnknownInvariantRoute { route: String },

    #[error("Insufficient funds to pay the constant fee: account {address} cannot cover {denom}")]
    InsufficientFeeFunds { address: Address, denom: Denom },

    #[error(transparent)]
    Keeper(#[from] KeeperError),
}

/// Wrapper for all message types
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Msg {
    Send(MsgSend),
    VerifyInvariant(MsgVerifyInvariant),
}

/// A multiparty transfer: debits from inputs, credits to outputs
///
/// Valid only when the denomination-wise sum of inputs equals the sum
/// of outputs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MsgSend {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
}

impl MsgSend {
    /// Create a send message
    pub fn new(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self { inputs, outputs }
    }

    /// Get the input legs
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// Get the output legs
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// True for the single-input single-output case
    pub fn is_plain_send(&self) -> bool {
        self.inputs.len() == 1 && self.outputs.len() == 1
    }

    /// Structural validation, performed before any state access
    ///
    /// Checks leg shape and conservation: the total debited must equal
    /// the total credited, denomination-wise.
    pub fn validate(&self) -> Result<(), MsgError> {
        if self.inputs.is_empty() {
            return Err(MsgError::EmptyInputs);
        }
        if self.outputs.is_empty() {
            return Err(MsgError::EmptyOutputs);
        }

        let mut input_sum = Coins::new();
        for input in &self.inputs {
            if input.coins().is_empty() {
                return Err(MsgError::EmptyLeg {
                    address: *input.address(),
                });
            }
            input_sum = input_sum
                .add(input.coins())
                .map_err(|overflow| MsgError::SumOverflow { denom: overflow.0 })?;
        }

        let mut output_sum = Coins::new();
        for output in &self.outputs {
            if output.coins().is_empty() {
                return Err(MsgError::EmptyLeg {
                    address: *output.address(),
                });
            }
            output_sum = output_sum
                .add(output.coins())
                .map_err(|overflow| MsgError::SumOverflow { denom: overflow.0 })?;
        }

        if input_sum != output_sum {
            return Err(MsgError::InputOutputMismatch);
        }

        Ok(())
    }
}

/// A request to run a registered invariant against current state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MsgVerifyInvariant {
    sender: Address,
    route: String,
}

impl MsgVerifyInvariant {
    /// Create a verification message
    pub fn new(sender: Address, route: impl Into<String>) -> Self {
        Self {
            sender,
            route: route.into(),
        }
    }

    /// The fee-paying sender
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// The invariant route to evaluate
    pub fn route(&self) -> &str {
        &self.route
    }
}
