pub mod breakpoints;
pub mod data;
pub mod health;
pub mod start;
pub mod step;
pub mod terminate;
