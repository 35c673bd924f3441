//! Core block data types.
//!
//! Strongly-typed block/header/signature entities shared across the
//! builder and validator: newtypes over raw bytes rather than naked
//! `Vec<u8>`/`[u8; N]` in public APIs.

pub mod block;

pub use block::{Block, BlockHeader, BlockSignature};
