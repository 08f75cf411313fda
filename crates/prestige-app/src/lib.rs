// Application and presentation layers for the Prestige command-line client

pub mod application;
pub mod presentation;
