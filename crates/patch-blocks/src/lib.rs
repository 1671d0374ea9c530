//! Anchor-driven structural rewriting of line-oriented text.
//!
//! A [`Recipe`] names an anchor line, the container that must follow it, and
//! the regions inside that container to drop or unwrap. [`apply`] folds the
//! [`Machine`] over a [`LineSequence`] and reports whether the whole shape
//! matched; [`guard::run_passes`] wraps that in load/commit cycles that only
//! touch the file on success.
//!
//! ```
//! use patch_blocks::{LineSequence, presets, apply};
//!
//! let input = LineSequence::parse("const tab = 1;\n");
//! let recipe = presets::find("certificates").unwrap();
//! let result = apply(&recipe, &input).unwrap();
//! assert!(!result.found);
//! assert_eq!(result.sequence, input);
//! ```

pub mod delimiter;
pub mod engine;
pub mod error;
pub mod guard;
pub mod line;
pub mod machine;
pub mod presets;
pub mod recipe;
pub mod scanner;
pub mod store;

pub use engine::{BlockSpan, EditResult, apply};
pub use error::{Error, Result};
pub use guard::{PassMode, PassReport, commit_if_found, run_pass, run_passes};
pub use line::{Line, LineEnding, LineSequence};
pub use machine::{Diagnostic, FailureReason, Machine, RegionSpan, State, Step};
pub use recipe::{
    CloseRule, Extent, NestingMode, OpenRule, Recipe, RegionAction, RegionRule, TitleRule,
};
pub use scanner::scan;
pub use store::LineStore;
