//! Route handlers organized by resource

pub mod counter;
pub mod health;
pub mod pages;
