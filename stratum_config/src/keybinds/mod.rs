//! The shared keybinds system.
//!
//! Every component contributes `group → action → [bindings]` entries to one
//! tree. [`PriorityMerge`] decides which component owns each action and which
//! bindings survive when two components claim the same physical input.

mod binding;
mod priority;
mod shared;

pub use binding::{Binding, BindingBehavior, ConsumePolicy, InputKey, InputType, PressType};
pub use priority::{PriorityMerge, PriorityOutcome};
pub use shared::{OwnershipMap, SharedTree};
