pub mod news;
pub mod social;
