//! Patterns sub-module: observable, lazy_object, singleton.

pub mod lazy_object;
pub mod observable;
pub mod singleton;
