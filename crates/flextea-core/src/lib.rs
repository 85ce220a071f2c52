/// FlexTea relay core: the content filter, the registration directory, the
/// per-user conversation state machine, the anonymous message router, and
/// the dialog orchestrator tying them together.
///
/// Transport-free by construction: one inbound text goes in, a batch of
/// outbound sends comes out. Delivery is the gateway's problem.

pub mod conversation;
pub mod directory;
pub mod filter;
pub mod prompts;
pub mod relay;
pub mod router;

pub use conversation::{Conversations, DialogState};
pub use directory::Directory;
pub use relay::Relay;
pub use router::{DeliveredReply, ReplySlot, Router, SlotStatus};
