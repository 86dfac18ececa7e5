pub mod backtest;
pub mod bands;
pub mod error;
pub mod freq;
pub mod markov;
pub mod prize;
pub mod score;
pub mod strategies;
