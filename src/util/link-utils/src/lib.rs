pub mod hash;
pub mod newtypes;
