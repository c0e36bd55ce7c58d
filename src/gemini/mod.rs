//! Gemini `generateContent` client and wire types.

mod client;
mod types;


pub use client::*;
pub use types::*;
