pub mod candidate;
pub mod requirements;
