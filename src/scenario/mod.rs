pub mod context;
pub mod model;
pub mod runner;
pub mod scenarios;
pub mod scope;
