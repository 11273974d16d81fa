pub mod model;
pub mod navigator;
pub mod session;
pub mod timer;
