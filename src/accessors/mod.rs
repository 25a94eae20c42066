pub mod accessor;
pub mod entity;

pub use accessor::Accessor;
pub use entity::{Entity, LiveEntity};

use crate::domain::ContactMessage;

pub type ContactAccessor = Accessor<ContactMessage>;
