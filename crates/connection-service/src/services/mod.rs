//! Service layer for Connection Service.
//!
//! # Components
//!
//! - `token_signer` - Signs room access tokens (trait seam plus JWT implementation)

pub mod token_signer;

pub use token_signer::mock::MockTokenSigner;
pub use token_signer::{JwtTokenSigner, TokenSigner};
