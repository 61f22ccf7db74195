pub mod controller;
pub mod provenance;
pub mod router;
