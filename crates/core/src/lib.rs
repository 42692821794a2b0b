//! Core business logic for Stockroom.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `valuation` - Weighted-average-cost inventory valuation

pub mod valuation;
