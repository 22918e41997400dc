pub mod calendar_service;
pub mod history_service;
pub mod like_service;
pub mod pagination;
pub mod rank_engine;
pub mod score_query;
pub mod timeline_service;
