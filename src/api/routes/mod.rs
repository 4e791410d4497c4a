pub mod compare;
pub mod leaders;
pub mod meta;
pub mod players;
