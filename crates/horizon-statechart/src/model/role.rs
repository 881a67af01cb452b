//! Data roles for item models.
//!
//! Roles define what type of data is being requested from a model item.
//! Each item can have multiple pieces of data associated with it,
//! distinguished by their role.

use horizon_statechart_core::ObjectId;

/// Roles for accessing different aspects of item data.
///
/// # Standard Roles
///
/// - **Display**: The primary text to show (e.g., item label)
/// - **ToolTip**: Text shown when hovering over the item
/// - **Object**: The identity of the object the row stands for
/// - **ObjectId**: The same identity as a raw integer, for interop
/// - **User**: Application-specific data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Primary text to display. Should return `String`.
    Display,

    /// Tooltip text shown on hover. Should return `String`.
    ToolTip,

    /// The object addressed by the index. Should return `Object`.
    Object,

    /// The raw integer form of the object identity. Should return `Int`.
    ObjectId,

    /// First role available for application-specific data.
    User(u32),
}

impl ItemRole {
    /// Returns `true` if this is a user-defined role.
    #[inline]
    pub fn is_user_role(&self) -> bool {
        matches!(self, ItemRole::User(_))
    }

    /// Returns the numeric value of this role.
    ///
    /// Standard roles have fixed values below 256, user roles start at 256.
    pub fn value(&self) -> u32 {
        match self {
            ItemRole::Display => 0,
            ItemRole::ToolTip => 3,
            ItemRole::Object => 129,
            ItemRole::ObjectId => 130,
            ItemRole::User(n) => 256 + n,
        }
    }

    /// Creates an ItemRole from a numeric value.
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            0 => Some(ItemRole::Display),
            3 => Some(ItemRole::ToolTip),
            129 => Some(ItemRole::Object),
            130 => Some(ItemRole::ObjectId),
            n if n >= 256 => Some(ItemRole::User(n - 256)),
            _ => None,
        }
    }
}

/// Container for item data.
///
/// # Example
///
/// ```
/// use horizon_statechart::model::ItemData;
///
/// let data = ItemData::from("idle");
/// assert_eq!(data.as_string(), Some("idle"));
/// assert!(ItemData::None.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemData {
    /// No data.
    #[default]
    None,
    /// String data (for Display, ToolTip, etc.).
    String(String),
    /// Integer data.
    Int(u64),
    /// An object identity.
    Object(ObjectId),
}

impl ItemData {
    /// Returns `true` if this is `ItemData::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, ItemData::None)
    }

    /// Returns the string value, if this is string data.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ItemData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts into an owned string, if this is string data.
    pub fn into_string(self) -> Option<String> {
        match self {
            ItemData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is integer data.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            ItemData::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the object identity, if this is object data.
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            ItemData::Object(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<&str> for ItemData {
    fn from(s: &str) -> Self {
        ItemData::String(s.to_string())
    }
}

impl From<String> for ItemData {
    fn from(s: String) -> Self {
        ItemData::String(s)
    }
}

impl From<u64> for ItemData {
    fn from(n: u64) -> Self {
        ItemData::Int(n)
    }
}

impl From<ObjectId> for ItemData {
    fn from(id: ObjectId) -> Self {
        ItemData::Object(id)
    }
}
