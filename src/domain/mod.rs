mod contact;
mod contact_id;
mod data_stores;
mod email;
mod email_client;
mod error;
mod flow_token;
mod password;
mod user;
mod user_id;
mod user_password_hash;
mod username;
mod verification_code;

pub use contact::*;
pub use contact_id::*;
pub use data_stores::*;
pub use email::*;
pub use email_client::*;
pub use error::*;
pub use flow_token::*;
pub use password::*;
pub use user::*;
pub use user_id::*;
pub use user_password_hash::*;
pub use username::*;
pub use verification_code::*;
