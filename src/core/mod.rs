// src/core/mod.rs - Safety-gated conversation engine

pub mod badges;
pub mod conversation;
pub mod hazard;
pub mod safety;
pub mod session;
pub mod system_prompt;
pub mod types;
