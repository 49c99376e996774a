//! Business logic services
//!
//! Services encapsulate the flows: validation first, authorization before
//! any side effect, then persistence and file-storage effects in order.

pub mod coal;
pub mod tobacco;
pub mod user;

pub use coal::CoalService;
pub use tobacco::TobaccoService;
pub use user::UserService;
