//! Auth workflows.
//!
//! Sign-up, sign-in, password recovery, sign-out, and the provider redirect
//! callback. All of them share one contract: a single provider call per
//! submission, and every outcome delivered as a typed redirect message.

pub mod callback;
pub(crate) mod cookies;
pub mod password;
pub mod redirect;
pub mod sign_in;
pub mod sign_up;
pub mod types;

pub use self::callback::callback;
pub use self::password::{forgot_password, reset_password};
pub use self::sign_in::{sign_in, sign_out};
pub use self::sign_up::sign_up;

#[cfg(test)]
pub(crate) mod test_support;
