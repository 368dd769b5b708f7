pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod home;
pub mod measure;
pub mod results;
pub mod sequencer;
pub mod service;
pub mod store;
pub mod submitter;
