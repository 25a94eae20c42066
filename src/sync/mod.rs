pub mod binding;
pub mod outbox;
pub mod state;

pub use binding::Binding;
pub use outbox::ContactOutbox;
pub use state::{Phase, ViewState};
