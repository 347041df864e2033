//! Keyhold Domain Concerns

pub mod companies;
