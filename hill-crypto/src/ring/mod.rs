//! # Ring Module
//!
//! Provides the [`Ring`] struct for the finite ring Z_n and the [`Vector`] / [`Matrix`]
//! types doing linear algebra over it.

pub mod helper;
pub mod math;
pub mod matrix;
pub mod vector;

pub use helper::{extended_gcd, gcd};
pub use math::{MAX_TABLE_MODULUS, Ring};
pub use matrix::Matrix;
pub use vector::Vector;
