//! Crime Scatter Library
//!
//! Loads a delimited observation table and renders a scatter plot of two of
//! its numeric columns (CrimeRate vs HousePrice by default).

pub mod config;
pub mod pipeline;
pub mod render;
pub mod table;
