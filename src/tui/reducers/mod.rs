pub mod content;
pub mod matchups;
pub mod sidebar;

pub use content::reduce_content;
pub use matchups::reduce_matchups;
pub use sidebar::reduce_sidebar;
