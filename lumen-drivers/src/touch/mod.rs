//! Touch controller drivers

pub mod gt911;

pub use gt911::{Gt911, Gt911Config, Gt911Error};
