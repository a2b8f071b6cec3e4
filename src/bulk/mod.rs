pub mod algorithm;
pub mod closures;
pub mod skin;
pub mod solver;
pub mod stability;
