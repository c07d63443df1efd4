//! Core forecasting logic for Spendcast.
//!
//! This crate contains pure forecasting logic with ZERO network or storage
//! dependencies. All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `forecast` - Moving-average expense forecasts and economic indicators

pub mod forecast;
