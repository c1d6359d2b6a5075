#![forbid(unsafe_code)]

//! Drag-engine configuration.
//!
//! [`SortableOptions`] is the flat option structure handed to a drag
//! engine. Every field is optional: `None` means "leave the engine
//! default". Layers of options merge with [`SortableOptions::merged_with`],
//! the overlay winning field by field. The precedence used by the host is
//!
//! ```text
//! global config < options input < individual option inputs
//! ```
//!
//! A live engine is reconfigured one key at a time through
//! [`OptionName`] / [`OptionValue`] pairs; [`SortableOptions::changed_keys`]
//! computes which keys need pushing after an options change.
//!
//! Callback slots are not part of this structure. They are owned by the
//! host layer, which installs its own handlers on every engine it creates.

use std::fmt;
use std::rc::Rc;

use crate::clone_policy::{PullContext, PullMode};
use crate::error::{OptionTypeError, PullCheckError};
use crate::event::InputEvent;

// ---------------------------------------------------------------------------
// Group membership
// ---------------------------------------------------------------------------

/// User predicate deciding the pull mode of a drag out of a region.
pub type PullPredicate = Rc<dyn Fn(&PullContext<'_>) -> Result<PullMode, PullCheckError>>;

/// User predicate deciding whether a region accepts a drop.
pub type PutPredicate = Rc<dyn Fn(&PullContext<'_>) -> bool>;

/// Whether items may be dragged out of a region.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PullRepr"))]
pub enum Pull {
    /// `true` moves items out, `false` forbids it.
    Allow(bool),
    /// Items are copied out; the source keeps the original.
    Clone,
    /// Items may move only into the named groups.
    Groups(Vec<String>),
    /// Decided per drag by a predicate.
    Decide(PullPredicate),
}

impl Default for Pull {
    fn default() -> Self {
        Self::Allow(true)
    }
}

impl PartialEq for Pull {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Allow(a), Self::Allow(b)) => a == b,
            (Self::Clone, Self::Clone) => true,
            (Self::Groups(a), Self::Groups(b)) => a == b,
            (Self::Decide(a), Self::Decide(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow(allow) => f.debug_tuple("Allow").field(allow).finish(),
            Self::Clone => f.write_str("Clone"),
            Self::Groups(groups) => f.debug_tuple("Groups").field(groups).finish(),
            Self::Decide(_) => f.write_str("Decide(<predicate>)"),
        }
    }
}

/// Whether items may be dropped into a region.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "PutRepr"))]
pub enum Put {
    Allow(bool),
    Groups(Vec<String>),
    Decide(PutPredicate),
}

impl Default for Put {
    fn default() -> Self {
        Self::Allow(true)
    }
}

impl PartialEq for Put {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Allow(a), Self::Allow(b)) => a == b,
            (Self::Groups(a), Self::Groups(b)) => a == b,
            (Self::Decide(a), Self::Decide(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Put {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow(allow) => f.debug_tuple("Allow").field(allow).finish(),
            Self::Groups(groups) => f.debug_tuple("Groups").field(groups).finish(),
            Self::Decide(_) => f.write_str("Decide(<predicate>)"),
        }
    }
}

/// Full group policy.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GroupOptions {
    pub name: Option<String>,
    pub pull: Pull,
    pub put: Put,
    pub revert_clone: bool,
}

impl GroupOptions {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    #[must_use]
    pub fn with_put(mut self, put: Put) -> Self {
        self.put = put;
        self
    }
}

/// The `group` option: a bare name or a full policy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum GroupOption {
    Name(String),
    Options(GroupOptions),
}

impl GroupOption {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Options(options) => options.name.as_deref(),
        }
    }

    /// The policy view; a bare name allows pull and put.
    #[must_use]
    pub fn policy(&self) -> Option<&GroupOptions> {
        match self {
            Self::Name(_) => None,
            Self::Options(options) => Some(options),
        }
    }
}

impl From<&str> for GroupOption {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<GroupOptions> for GroupOption {
    fn from(options: GroupOptions) -> Self {
        Self::Options(options)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PullRepr {
    Flag(bool),
    Mode(String),
    Groups(Vec<String>),
}

#[cfg(feature = "serde")]
impl TryFrom<PullRepr> for Pull {
    type Error = String;

    fn try_from(repr: PullRepr) -> Result<Self, Self::Error> {
        match repr {
            PullRepr::Flag(allow) => Ok(Self::Allow(allow)),
            PullRepr::Mode(mode) if mode == "clone" => Ok(Self::Clone),
            PullRepr::Mode(other) => Err(format!("unknown pull mode: {other}")),
            PullRepr::Groups(groups) => Ok(Self::Groups(groups)),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PutRepr {
    Flag(bool),
    Groups(Vec<String>),
}

#[cfg(feature = "serde")]
impl From<PutRepr> for Put {
    fn from(repr: PutRepr) -> Self {
        match repr {
            PutRepr::Flag(allow) => Self::Allow(allow),
            PutRepr::Groups(groups) => Self::Groups(groups),
        }
    }
}

// ---------------------------------------------------------------------------
// Other option shapes
// ---------------------------------------------------------------------------

/// Sorting axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Vertical,
    Horizontal,
}

/// Pixel offset of the fallback ghost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

/// Which pointer-downs must not start a drag.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String"))]
pub enum Filter {
    Selector(String),
    Predicate(Rc<dyn Fn(&InputEvent) -> bool>),
}

impl From<String> for Filter {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Selector(a), Self::Selector(b)) => a == b,
            (Self::Predicate(a), Self::Predicate(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

/// Drag payload written for native drag-and-drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
}

impl DataTransfer {
    pub fn set_data(&mut self, format: impl Into<String>, data: impl Into<String>) {
        let format = format.into();
        let data = data.into();
        match self.entries.iter_mut().find(|(f, _)| *f == format) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((format, data)),
        }
    }

    #[must_use]
    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == format)
            .map(|(_, d)| d.as_str())
    }
}

/// `setData` hook.
#[derive(Clone)]
pub struct SetData(pub Rc<dyn Fn(&mut DataTransfer)>);

impl PartialEq for SetData {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SetData(<fn>)")
    }
}

/// Persistence of a region's order, keyed by data-id.
pub trait OrderStore {
    fn get(&self) -> Vec<String>;
    fn set(&self, order: &[String]);
}

/// `store` hook.
#[derive(Clone)]
pub struct Store(pub Rc<dyn OrderStore>);

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Store(<dyn OrderStore>)")
    }
}

// ---------------------------------------------------------------------------
// Option values
// ---------------------------------------------------------------------------

/// Value carried by a single-key reconfiguration.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(u32),
    Float(f64),
    Text(String),
    Group(GroupOption),
    Offset(Offset),
    Direction(Direction),
    Filter(Filter),
    SetData(SetData),
    Store(Store),
}

impl OptionValue {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Group(_) => "group",
            Self::Offset(_) => "offset",
            Self::Direction(_) => "direction",
            Self::Filter(_) => "filter",
            Self::SetData(_) => "set-data",
            Self::Store(_) => "store",
        }
    }
}

fn kind_label(variant: &str) -> &'static str {
    match variant {
        "Bool" => "bool",
        "Int" => "int",
        "Float" => "float",
        "Text" => "text",
        "Group" => "group",
        "Offset" => "offset",
        "Direction" => "direction",
        "Filter" => "filter",
        "SetData" => "set-data",
        _ => "store",
    }
}

// ---------------------------------------------------------------------------
// The option table
// ---------------------------------------------------------------------------

macro_rules! option_table {
    ($( $(#[$attr:meta])* $variant:ident => $field:ident : $ty:ty, $key:literal, $kind:ident; )*) => {
        /// Engine configuration. `None` fields defer to the engine default.
        #[derive(Debug, Clone, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
        pub struct SortableOptions {
            $(
                #[doc = concat!("`", $key, "`")]
                $(#[$attr])*
                pub $field: Option<$ty>,
            )*
        }

        /// Name of an individually bindable option.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OptionName {
            $( $variant, )*
        }

        impl OptionName {
            /// Every individually bindable option, in declaration order.
            pub const ALL: &'static [OptionName] = &[ $( OptionName::$variant, )* ];

            /// The engine's key for this option.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( OptionName::$variant => $key, )*
                }
            }

            #[must_use]
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $( $key => Some(OptionName::$variant), )*
                    _ => None,
                }
            }
        }

        impl SortableOptions {
            /// Current value of `name`.
            #[must_use]
            pub fn get(&self, name: OptionName) -> Option<OptionValue> {
                match name {
                    $( OptionName::$variant => self.$field.clone().map(OptionValue::$kind), )*
                }
            }

            /// Assign `name`; `None` clears it back to the engine default.
            pub fn set(
                &mut self,
                name: OptionName,
                value: Option<OptionValue>,
            ) -> Result<(), OptionTypeError> {
                match name {
                    $(
                        OptionName::$variant => {
                            self.$field = match value {
                                None => None,
                                Some(OptionValue::$kind(v)) => Some(v),
                                Some(other) => {
                                    return Err(OptionTypeError {
                                        name,
                                        expected: kind_label(stringify!($kind)),
                                        found: other.kind_name(),
                                    });
                                }
                            };
                        }
                    )*
                }
                Ok(())
            }

            /// Field-wise merge: `overlay` wins wherever it is set.
            #[must_use]
            pub fn merged_with(&self, overlay: &Self) -> Self {
                Self {
                    $( $field: overlay.$field.clone().or_else(|| self.$field.clone()), )*
                }
            }
        }
    };
}

option_table! {
    Group => group: GroupOption, "group", Group;
    Sort => sort: bool, "sort", Bool;
    Delay => delay: u32, "delay", Int;
    Disabled => disabled: bool, "disabled", Bool;
    Draggable => draggable: String, "draggable", Text;
    Handle => handle: String, "handle", Text;
    Animation => animation: u32, "animation", Int;
    GhostClass => ghost_class: String, "ghostClass", Text;
    ChosenClass => chosen_class: String, "chosenClass", Text;
    DragClass => drag_class: String, "dragClass", Text;
    FallbackOnBody => fallback_on_body: bool, "fallbackOnBody", Bool;
    FallbackTolerance => fallback_tolerance: u32, "fallbackTolerance", Int;
    FallbackClass => fallback_class: String, "fallbackClass", Text;
    FallbackOffset => fallback_offset: Offset, "fallbackOffset", Offset;
    ForceFallback => force_fallback: bool, "forceFallback", Bool;
    Filter => filter: Filter, "filter", Filter;
    PreventOnFilter => prevent_on_filter: bool, "preventOnFilter", Bool;
    Direction => direction: Direction, "direction", Direction;
    SwapThreshold => swap_threshold: f64, "swapThreshold", Float;
    InvertSwap => invert_swap: bool, "invertSwap", Bool;
    InvertedSwapThreshold => inverted_swap_threshold: f64, "invertedSwapThreshold", Float;
    RemoveCloneOnHide => remove_clone_on_hide: bool, "removeCloneOnHide", Bool;
    Ignore => ignore: String, "ignore", Text;
    TouchStartThreshold => touch_start_threshold: u32, "touchStartThreshold", Int;
    EmptyInsertThreshold => empty_insert_threshold: u32, "emptyInsertThreshold", Int;
    DropBubble => drop_bubble: bool, "dropBubble", Bool;
    DragoverBubble => dragover_bubble: bool, "dragoverBubble", Bool;
    DataIdAttr => data_id_attr: String, "dataIdAttr", Text;
    DelayOnTouchOnly => delay_on_touch_only: bool, "delayOnTouchOnly", Bool;
    Easing => easing: String, "easing", Text;
    #[cfg_attr(feature = "serde", serde(skip))]
    SetData => set_data: SetData, "setData", SetData;
    #[cfg_attr(feature = "serde", serde(skip))]
    Store => store: Store, "store", Store;
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SortableOptions {
    /// Keys set in `self` whose value differs from `previous`.
    ///
    /// Keys only present in `previous` are not reported: clearing an input
    /// does not reconfigure a live engine.
    #[must_use]
    pub fn changed_keys(&self, previous: &Self) -> Vec<OptionName> {
        OptionName::ALL
            .iter()
            .copied()
            .filter(|&name| {
                let current = self.get(name);
                current.is_some() && current != previous.get(name)
            })
            .collect()
    }

    /// Keys that are set.
    #[must_use]
    pub fn set_keys(&self) -> Vec<OptionName> {
        OptionName::ALL
            .iter()
            .copied()
            .filter(|&name| self.get(name).is_some())
            .collect()
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<GroupOption>) -> Self {
        self.group = Some(group.into());
        self
    }
}
