pub mod character;
pub mod monster;
pub mod scorer;
pub mod tier;
