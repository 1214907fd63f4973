//! Board core: reordering, collision resolution and the drag session.

pub mod collision;
pub mod ordering;
pub mod session;

pub use collision::resolve_collision;
pub use ordering::{min_column_rows, orphaned_tasks, InsertEdge};
pub use session::{persist_move, DragOutcome, DragSession, Settlement};
