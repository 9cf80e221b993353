//! Admin access: the backend's token authority and the storefront's session state.

pub mod authority;
pub mod session;

pub use authority::{bearer_token, AccessToken, AdminAuthority, AuthError, LoginRequest};
pub use session::{
    AdminSession, FileTokenStore, MemoryTokenStore, SessionState, TokenStore, TokenStoreError,
};
