pub mod models;
pub mod history;
pub mod manager;
pub mod undo;
pub mod layout;
pub mod session;

#[cfg(test)]
mod testing;

pub use models::{Operation, OperationKind, PriorState, SeatRef};
pub use history::{OperationLog, DEFAULT_HISTORY_LIMIT};
pub use manager::{AssignmentService, SeatView, DEFAULT_BLOCK_REASON};
pub use session::EditorSession;
