// Message dispatch - one all-or-nothing transaction per message
//
// Every message runs inside a StateTransaction. Rejection and halt both
// discard the transaction; only a committed outcome reaches the store.

use crate::account::{AccountStore, StateTransaction};
use crate::invariant::{verify_invariant, Halt, InvariantRegistry, VerifyError, VerifyOutcome};
use crate::keeper::{BaseKeeper, KeeperError};
use crate::msg::{send_tags, verify_invariant_tags, Msg, MsgError, MsgSend, MsgVerifyInvariant, Tag};
use crate::params::Params;
use tracing::{error, info, warn};

/// The result of dispatching one message
#[derive(Debug)]
pub enum DispatchOutcome {
    /// State changes committed; tags describe the effect
    Committed { tags: Vec<Tag> },
    /// Recoverable failure; no state change
    Rejected(MsgError),
    /// Fatal invariant violation; no state change, processing must stop
    Halted(Halt),
}

impl DispatchOutcome {
    /// True when the message committed
    pub fn is_committed(&self) -> bool {
        matches!(self, DispatchOutcome::Committed { .. })
    }

    /// True when the outcome is fatal
    pub fn is_halted(&self) -> bool {
        matches!(self, DispatchOutcome::Halted(_))
    }
}

enum Failure {
    Reject(MsgError),
    Halt(Halt),
}

impl From<MsgError> for Failure {
    fn from(err: MsgError) -> Self {
        Failure::Reject(err)
    }
}

impl From<KeeperError> for Failure {
    fn from(err: KeeperError) -> Self {
        Failure::Reject(MsgError::Keeper(err))
    }
}

/// Routes messages to their handlers under a transaction boundary
pub struct Router {
    keeper: BaseKeeper,
    registry: InvariantRegistry,
    params: Params,
}

impl Router {
    /// Assemble a router from a populated registry and params
    pub fn new(registry: InvariantRegistry, params: Params) -> Self {
        Self {
            keeper: BaseKeeper::new(),
            registry,
            params,
        }
    }

    /// The full-permission keeper backing the handlers
    pub fn keeper(&self) -> &BaseKeeper {
        &self.keeper
    }

    /// The invariant registry
    pub fn registry(&self) -> &InvariantRegistry {
        &self.registry
    }

    /// The ledger params
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Execute one message against the store
    pub fn dispatch<S: AccountStore>(&self, store: &mut S, msg: &Msg) -> DispatchOutcome {
        let mut txn = StateTransaction::new(store);

        let result = match msg {
            Msg::Send(send) => self.handle_send(&mut txn, send),
            Msg::VerifyInvariant(verify) => self.handle_verify_invariant(&mut txn, verify),
        };

        match result {
            Ok(tags) => match txn.commit() {
                Ok(()) => {
                    info!("message committed");
                    DispatchOutcome::Committed { tags }
                }
                Err(err) => {
                    warn!(%err, "commit failed");
                    DispatchOutcome::Rejected(MsgError::Keeper(KeeperError::Store(err)))
                }
            },
            Err(Failure::Reject(err)) => {
                warn!(%err, "message rejected");
                DispatchOutcome::Rejected(err)
            }
            Err(Failure::Halt(halt)) => {
                error!(%halt, "halting message processing");
                DispatchOutcome::Halted(halt)
            }
        }
    }

    fn handle_send<S: AccountStore>(
        &self,
        store: &mut S,
        msg: &MsgSend,
    ) -> Result<Vec<Tag>, Failure> {
        msg.validate()?;
        self.keeper
            .input_output_coins(store, msg.inputs(), msg.outputs())?;
        Ok(send_tags(msg))
    }

    fn handle_verify_invariant<S: AccountStore>(
        &self,
        store: &mut S,
        msg: &MsgVerifyInvariant,
    ) -> Result<Vec<Tag>, Failure> {
        match verify_invariant(
            store,
            &self.keeper,
            &self.registry,
            &self.params,
            msg.sender(),
            msg.route(),
        ) {
            Ok(VerifyOutcome::Passed) => Ok(verify_invariant_tags(msg.sender(), msg.route())),
            Ok(VerifyOutcome::Broken(halt)) => Err(Failure::Halt(halt)),
            Err(VerifyError::UnknownRoute { route }) => {
                Err(Failure::Reject(MsgError::UnknownInvariantRoute { route }))
            }
            Err(VerifyError::InsufficientFeeFunds { address, denom }) => {
                Err(Failure::Reject(MsgError::InsufficientFeeFunds { address, denom }))
            }
            Err(VerifyError::Keeper(err)) => Err(Failure::Reject(MsgError::Keeper(err))),
        }
    }
}
