//! Built-in rules.

pub mod code_style;
pub mod emphasis_style;
pub mod no_git_conflict_marker;
pub mod no_tab;
pub mod skip;
pub mod unordered_list_style;

pub use code_style::{CodeStyleOption, CodeStyleOptions, ConsistentCodeStyle};
pub use emphasis_style::{MarkerKind, MarkerOption, MarkerStyle, MarkerStyleOptions};
pub use no_git_conflict_marker::{NoGitConflictMarker, NoGitConflictMarkerOptions};
pub use no_tab::{NoTab, NoTabOptions};
pub use skip::SkipCode;
pub use unordered_list_style::{
    ConsistentUnorderedListStyle, DepthOption, ListStyleOption, ListStyleOptions,
};
