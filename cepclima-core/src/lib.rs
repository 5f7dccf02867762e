//! # CEP Clima Core
//!
//! Core types, errors, and pure logic for the CEP Clima lookup service.
//!
//! This crate provides the building blocks used by all other CEP Clima crates:
//!
//! - **Types**: postal codes, locations, weather readings and the final
//!   temperature result
//! - **Errors**: the lookup error taxonomy
//! - **Validator**: CEP normalization and validation
//! - **Convert**: Celsius to Fahrenheit/Kelvin conversion
//! - **Traits**: interfaces for the two upstream collaborators
//!
//! ## Example
//!
//! ```rust
//! use cepclima_core::{convert, validator};
//!
//! let cep = validator::validate_and_normalize("01310-100").unwrap();
//! assert_eq!(cep.as_str(), "01310100");
//!
//! let result = convert::convert_all(25.0, "São Paulo");
//! assert_eq!(result.temp_f, 77.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod convert;
pub mod error;
pub mod traits;
pub mod types;
pub mod validator;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{ClimaError, Result};
pub use traits::*;
pub use types::*;
