pub mod docs;
pub mod health;
pub mod items;
pub mod me;
