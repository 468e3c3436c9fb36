pub mod completion;
pub mod finger_guide;
pub mod keyboard_diagram;
pub mod lesson_index;
pub mod progress_bar;
pub mod stats_sidebar;
pub mod task_card;
pub mod typing_area;
