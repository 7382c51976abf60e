//! Input bindings and their semantic identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uncased::Uncased;

use crate::{Node, StratumError, StratumResult};

/// Device class of a binding.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// A keyboard key.
    Keyboard,
    /// A mouse button or wheel direction.
    Mouse,
    /// A gamepad button or axis.
    Gamepad,
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keyboard => "keyboard",
            Self::Mouse => "mouse",
            Self::Gamepad => "gamepad",
        })
    }
}

/// When a binding fires relative to the physical press.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressType {
    /// Fires on the initial press.
    #[default]
    Press,
    /// Fires on release.
    Release,
    /// Fires after the input is held for `press_threshold` seconds.
    Hold,
    /// Fires on two presses within `press_threshold` seconds.
    Double,
}

/// Whether a matched input is hidden from the host application.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumePolicy {
    /// Always swallow the input.
    Always,
    /// Swallow the input only when the action handled it.
    #[default]
    OnMatch,
    /// Never swallow the input.
    Never,
}

/// What the bound action does when triggered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingBehavior {
    /// Runs the action once.
    #[default]
    Trigger,
    /// Flips an on/off state.
    Toggle,
    /// Keeps the action active while the input is held.
    Hold,
}

/// One input-device mapping attached to an action.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum_config::{Binding, InputType};
///
/// let binding = Binding::parse(&json!({"type": "keyboard", "key": "f1"}))?;
/// assert_eq!(binding.input, InputType::Keyboard);
/// assert_eq!(binding.input_key().to_string(), "keyboard f1");
/// assert!(binding.same_input(&Binding::new(InputType::Keyboard, "F1")));
/// # Ok::<_, std::sync::Arc<stratum_config::StratumError>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Device class.
    #[serde(rename = "type")]
    pub input: InputType,
    /// Key, button or axis identifier on that device.
    pub key: String,
    /// When the binding fires.
    #[serde(default)]
    pub press: PressType,
    /// Hold or double-press window in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub press_threshold: Option<f64>,
    /// Input consumption policy.
    #[serde(default)]
    pub consume: ConsumePolicy,
    /// Action behaviour.
    #[serde(default)]
    pub behavior: BindingBehavior,
}

/// The physical input a binding listens to.
///
/// Two bindings conflict when their input keys are equal, regardless of
/// press type or behaviour. Key identifiers compare case-insensitively but
/// keep the spelling they were declared with.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct InputKey {
    input: InputType,
    key: Uncased<'static>,
}

impl InputKey {
    /// Device class of the input.
    #[must_use]
    pub const fn input(&self) -> InputType {
        self.input
    }

    /// Key identifier as declared, without surrounding whitespace.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.input, self.key)
    }
}

impl Binding {
    /// Creates a binding with default press, consume and behaviour settings.
    #[must_use]
    pub fn new(input: InputType, key: impl Into<String>) -> Self {
        Self {
            input,
            key: key.into(),
            press: PressType::default(),
            press_threshold: None,
            consume: ConsumePolicy::default(),
            behavior: BindingBehavior::default(),
        }
    }

    /// Parses and validates a binding from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::InvalidBinding`] when the value does not
    /// deserialize, the key is blank, or the press threshold is not a
    /// positive finite number.
    pub fn parse(value: &Value) -> StratumResult<Self> {
        let binding: Self = serde_json::from_value(value.clone())
            .map_err(|err| StratumError::invalid_binding(err.to_string()))?;
        binding.validate()?;
        Ok(binding)
    }

    /// Parses a binding held in a merged tree.
    ///
    /// # Errors
    ///
    /// Fails under the same rules as [`Binding::parse`].
    pub fn from_node(node: &Node) -> StratumResult<Self> {
        Self::parse(&Value::from(node.unwrapped()))
    }

    fn validate(&self) -> StratumResult<()> {
        if self.key.trim().is_empty() {
            return Err(StratumError::invalid_binding("key must not be empty"));
        }
        if let Some(threshold) = self.press_threshold {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(StratumError::invalid_binding(format!(
                    "press_threshold must be positive, got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Semantic identity of the physical input.
    #[must_use]
    pub fn input_key(&self) -> InputKey {
        InputKey {
            input: self.input,
            key: Uncased::from(self.key.trim().to_owned()),
        }
    }

    /// `true` when both bindings listen to the same physical input.
    #[must_use]
    pub fn same_input(&self, other: &Self) -> bool {
        self.input_key() == other.input_key()
    }

    /// JSON form of the binding.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Tree form of the binding.
    #[must_use]
    pub fn to_node(&self) -> Node {
        Node::from(self.to_value())
    }
}
