pub mod collision;
pub mod compute;
pub mod entities;
pub mod error;
pub mod rules;
pub mod spawn;
