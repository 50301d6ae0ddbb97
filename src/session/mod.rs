pub mod state;
pub mod view;

pub use state::ChatState;
pub use view::{DisplayedMessage, SenderHeader, ViewEvent};
