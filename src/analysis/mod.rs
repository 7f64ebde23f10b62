pub mod statistics;
pub mod returns;
pub mod divergence;
pub mod momentum;
pub mod gamma;
pub mod signals;
pub mod sentiment;
