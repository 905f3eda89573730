pub mod health;
pub mod inventories;
pub mod languages;
pub mod profiles;
pub mod tags;
pub mod types;
