pub mod models;
pub mod rules;
pub mod planner;

pub use models::{BulkAssignmentSuggestion, Confidence, SuggestionSource};
pub use rules::{CompanionMatcher, PositionRule};
pub use planner::BulkPlanner;
