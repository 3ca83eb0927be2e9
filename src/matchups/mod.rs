//! Matchup tool: fragment index resolution, dropdown lists and the selection form

pub mod form;
pub mod index;
pub mod lists;
pub mod mode;
pub mod options;
pub mod tool;

pub use form::{Dropdown, Evaluation, FormStatus, MatchupForm, ResolvedRow};
pub use index::FragmentIndex;
pub use lists::{MatchupLists, OptionGroup, YearLists};
pub use mode::{KeyKind, MatchupMode, Side};
pub use options::{DropdownOptions, OptionRole, OptionsResolver};
pub use tool::{MatchupTool, RenderTicket, RenderedMatchup, Update};

/// Site-relative location of the fragment index
pub const INDEX_PATH: &str = "assets/matchups/matchups_index.json";

/// Site-relative location of the precomputed dropdown pack
pub const LISTS_PATH: &str = "assets/matchups/matchups_lists.json";

/// Markup marker of a page hosting the matchup tool
pub const TOOL_MARKER: &str = r#"id="matchups_tool""#;
