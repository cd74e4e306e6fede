//! Validation error vocabulary shared by every validator in the crate
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

pub mod error;

pub use error::{ErrorCode, ValidationError, ValidationErrors};
