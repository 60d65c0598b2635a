pub mod decoder;
pub mod model;
pub mod trainer;
