mod hashmap_contact_store;
mod hashmap_flow_session_store;
mod hashmap_user_store;
mod hashset_banned_token_store;
mod postgres_contact_store;
mod postgres_user_store;
mod redis_banned_token_store;
mod redis_flow_session_store;

pub use hashmap_contact_store::*;
pub use hashmap_flow_session_store::*;
pub use hashmap_user_store::*;
pub use hashset_banned_token_store::*;
pub use postgres_contact_store::*;
pub use postgres_user_store::*;
pub use redis_banned_token_store::*;
pub use redis_flow_session_store::*;
