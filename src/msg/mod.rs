// Message module - The transaction surface of the ledger
// Structural validation, all-or-nothing dispatch, and result tags

mod handler;
mod model;
mod tags;

pub use handler::{DispatchOutcome, Router};
pub use model::{Msg, MsgError, MsgSend, MsgVerifyInvariant};
pub use tags::{
    send_tags, verify_invariant_tags, Tag, TAG_ACTION, TAG_CATEGORY, TAG_RECIPIENT, TAG_SENDER,
};
