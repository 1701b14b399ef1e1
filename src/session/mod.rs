pub mod store;
pub mod types;

pub use store::SessionStore;
pub use types::{Role, Session, Turn};
