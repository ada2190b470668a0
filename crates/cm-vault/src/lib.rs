mod identity;
mod keys;
mod pool;
mod vault_error;

pub use identity::{IdentityBlocks, IDENTITY_BLOCK_SIZE};
pub use keys::SessionKeys;
pub use pool::IDENTITY_POOL;
pub use vault_error::VaultError;
