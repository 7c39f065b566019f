mod auth;
mod contacts;
mod users;

pub use auth::*;
pub use contacts::*;
pub use users::*;
