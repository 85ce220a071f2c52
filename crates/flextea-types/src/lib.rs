/// FlexTea shared types: ids, the post domain enums, the message record,
/// and the inbound/outbound events exchanged between the webhook layer,
/// the relay core, and outbound delivery.

pub mod events;
pub mod ids;
pub mod models;

pub use events::{InboundText, Outbound};
pub use ids::{MessageId, ParseMessageIdError, UserId};
pub use models::{Audience, Category, Message};
