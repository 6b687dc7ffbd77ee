//! Reusable view components.

pub mod data_table;
