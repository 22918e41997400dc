pub mod ledger;
pub mod like;
pub mod score;
pub mod track;
