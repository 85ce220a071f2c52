/// FlexTea outbound delivery: the Telegram Bot API client, the fire-once
/// fan-out dispatcher, and the webhook wire types.

pub mod dispatcher;
pub mod telegram;
pub mod update;

pub use dispatcher::Dispatcher;
pub use telegram::{DeliveryError, TelegramClient};
pub use update::Update;
