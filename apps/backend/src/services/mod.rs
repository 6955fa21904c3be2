pub mod excursions;
pub mod repair;
