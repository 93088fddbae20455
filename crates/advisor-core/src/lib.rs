pub mod advisor;
pub mod error;
pub mod history;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod store;
