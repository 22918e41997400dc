pub mod like_repository;
pub mod score_repository;
pub mod track_repository;
