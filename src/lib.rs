pub mod bankroll;
pub mod cards;
pub mod cli;
pub mod config;
pub mod counting;
pub mod dealer;
pub mod display;
pub mod engine;
pub mod error;
pub mod hand;
pub mod logging;
pub mod request;
pub mod shoe;
pub mod simulator;
