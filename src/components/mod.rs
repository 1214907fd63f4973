//! UI Components
//!
//! Leptos views for the board.

mod board_column;
mod board_view;
mod task_card;
mod task_detail;

pub use board_column::BoardColumn;
pub use board_view::BoardView;
pub use task_card::TaskCard;
pub use task_detail::TaskDetail;
