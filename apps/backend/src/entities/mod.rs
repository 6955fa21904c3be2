pub mod excursions;
pub mod users;
