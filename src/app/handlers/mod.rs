//! Feature-Handler: dünne Dispatch-Schicht zwischen Controller und
//! Use-Cases.

pub mod config;
pub mod editing;
pub mod measure;
pub mod selection;
