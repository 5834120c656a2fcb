pub mod application_service;
pub mod clock;
pub mod mood_repository;
