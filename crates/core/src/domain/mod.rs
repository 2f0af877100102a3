pub mod age;
pub mod effect;
pub mod goal;
pub mod product;
pub mod simulation;
pub mod stack;
