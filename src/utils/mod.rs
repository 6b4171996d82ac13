pub mod runtime;
pub mod security;
