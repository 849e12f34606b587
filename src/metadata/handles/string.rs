//! Handles into the `#Strings` heap, and the projected names of WinRT metadata.
//!
//! A [`StringHandle`] carries one of four flavours in its top three bits:
//!
//! - plain, a NUL-terminated string at the offset
//! - dot-terminated, the string up to the first `.` (a namespace prefix)
//! - WinRT-prefixed, the heap string with `<WinRT>` in front
//! - virtual, one of the fixed [`StringVirtualIndex`] names

use std::fmt;

use strum::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

use crate::{
    metadata::handles::{
        handletype::{
            is_valid_heap_offset, HandleType, StringHandleType, HEAP_OFFSET_BIT_COUNT,
            HEAP_OFFSET_MASK, NON_VIRTUAL_STRING_TYPE_MASK, ROW_ID_BIT_COUNT, TOKEN_VIRTUAL_BIT,
            VIRTUAL_BIT,
        },
        Handle, HandleKind, SpecificHandle,
    },
    Error, Result,
};

/// How the bytes behind a [`StringHandle`] are to be read.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromRepr)]
#[repr(u8)]
pub enum StringKind {
    /// NUL-terminated UTF-8 on the `#Strings` heap
    Plain = 0,
    /// Terminated by NUL or by the first `.`, whichever comes first
    DotTerminated = 1,
    /// A projected name without physical backing, see [`StringVirtualIndex`]
    Virtual = 4,
    /// Plain string that reads with a `<WinRT>` prefix prepended
    WinRTPrefixed = 5,
}

/// Names synthesized when projecting Windows Runtime metadata onto .NET types.
///
/// Virtual string handles store one of these as their payload. [`StringVirtualIndex::value`]
/// returns the text the name stands for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, FromRepr, IntoStaticStr)]
#[repr(u32)]
#[allow(missing_docs, clippy::upper_case_acronyms)]
pub enum StringVirtualIndex {
    #[strum(to_string = "System.Runtime.WindowsRuntime")]
    SystemRuntimeWindowsRuntime,
    #[strum(to_string = "System.Runtime")]
    SystemRuntime,
    #[strum(to_string = "System.ObjectModel")]
    SystemObjectModel,
    #[strum(to_string = "System.Runtime.WindowsRuntime.UI.Xaml")]
    SystemRuntimeWindowsRuntimeUiXaml,
    #[strum(to_string = "System.Runtime.InteropServices.WindowsRuntime")]
    SystemRuntimeInteropServicesWindowsRuntime,
    #[strum(to_string = "System.Numerics.Vectors")]
    SystemNumericsVectors,

    Dispose,
    AttributeTargets,
    AttributeUsageAttribute,
    Color,
    CornerRadius,
    DateTimeOffset,
    Duration,
    DurationType,
    #[strum(to_string = "EventHandler`1")]
    EventHandler1,
    EventRegistrationToken,
    Exception,
    GeneratorPosition,
    GridLength,
    GridUnitType,
    ICommand,
    #[strum(to_string = "IDictionary`2")]
    IDictionary2,
    IDisposable,
    IEnumerable,
    #[strum(to_string = "IEnumerable`1")]
    IEnumerable1,
    IList,
    #[strum(to_string = "IList`1")]
    IList1,
    INotifyCollectionChanged,
    INotifyPropertyChanged,
    #[strum(to_string = "IReadOnlyDictionary`2")]
    IReadOnlyDictionary2,
    #[strum(to_string = "IReadOnlyList`1")]
    IReadOnlyList1,
    KeyTime,
    #[strum(to_string = "KeyValuePair`2")]
    KeyValuePair2,
    Matrix,
    Matrix3D,
    Matrix3x2,
    Matrix4x4,
    NotifyCollectionChangedAction,
    NotifyCollectionChangedEventArgs,
    NotifyCollectionChangedEventHandler,
    #[strum(to_string = "Nullable`1")]
    Nullable1,
    Plane,
    Point,
    PropertyChangedEventArgs,
    PropertyChangedEventHandler,
    Quaternion,
    Rect,
    RepeatBehavior,
    RepeatBehaviorType,
    Size,
    System,
    #[strum(to_string = "System.Collections")]
    SystemCollections,
    #[strum(to_string = "System.Collections.Generic")]
    SystemCollectionsGeneric,
    #[strum(to_string = "System.Collections.Specialized")]
    SystemCollectionsSpecialized,
    #[strum(to_string = "System.ComponentModel")]
    SystemComponentModel,
    #[strum(to_string = "System.Numerics")]
    SystemNumerics,
    #[strum(to_string = "System.Windows.Input")]
    SystemWindowsInput,
    Thickness,
    TimeSpan,
    Type,
    Uri,
    Vector2,
    Vector3,
    Vector4,
    #[strum(to_string = "Windows.Foundation")]
    WindowsFoundation,
    #[strum(to_string = "Windows.UI")]
    WindowsUi,
    #[strum(to_string = "Windows.UI.Xaml")]
    WindowsUiXaml,
    #[strum(to_string = "Windows.UI.Xaml.Controls.Primitives")]
    WindowsUiXamlControlsPrimitives,
    #[strum(to_string = "Windows.UI.Xaml.Media")]
    WindowsUiXamlMedia,
    #[strum(to_string = "Windows.UI.Xaml.Media.Animation")]
    WindowsUiXamlMediaAnimation,
    #[strum(to_string = "Windows.UI.Xaml.Media.Media3D")]
    WindowsUiXamlMediaMedia3D,
}

impl StringVirtualIndex {
    /// The text of this projected name
    #[must_use]
    pub fn value(self) -> &'static str {
        self.into()
    }
}

/// A reference to a string on the `#Strings` heap, or to a projected name.
///
/// The payload packs a 29-bit heap offset (or virtual index) with three bits of
/// [`StringKind`]. Only plain handles may be turned into another flavour; applying a second
/// flavour is a contract violation that debug builds catch with an assertion.
///
/// # Examples
///
/// ```rust
/// use cilhandles::prelude::*;
///
/// let name = StringHandle::from_offset(0x64);
/// let namespace_segment = name.with_dot_termination();
///
/// assert_eq!(namespace_segment.string_kind(), StringKind::DotTerminated);
/// assert_eq!(namespace_segment.heap_offset(), 0x64);
///
/// let handle: Handle = namespace_segment.into();
/// assert_eq!(StringHandle::try_from(handle)?, namespace_segment);
/// # Ok::<(), cilhandles::Error>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StringHandle {
    value: u32,
}

impl StringHandle {
    /// Creates a plain handle for the string at `offset` of the `#Strings` heap.
    ///
    /// `offset` must fit into 29 bits.
    #[must_use]
    pub const fn from_offset(offset: u32) -> Self {
        debug_assert!(is_valid_heap_offset(offset));
        StringHandle {
            value: StringHandleType::STRING | offset,
        }
    }

    /// Creates a handle for a projected name.
    #[must_use]
    pub const fn from_virtual_index(index: StringVirtualIndex) -> Self {
        StringHandle {
            value: StringHandleType::VIRTUAL_STRING | index as u32,
        }
    }

    /// The same string, read with a `<WinRT>` prefix.
    ///
    /// Must only be called on a plain handle.
    #[must_use]
    pub fn with_winrt_prefix(&self) -> Self {
        debug_assert!(self.string_kind() == StringKind::Plain);
        StringHandle {
            value: StringHandleType::WINRT_PREFIXED_STRING | self.value,
        }
    }

    /// The same string, cut at its first `.`.
    ///
    /// Must only be called on a plain handle.
    #[must_use]
    pub fn with_dot_termination(&self) -> Self {
        debug_assert!(self.string_kind() == StringKind::Plain);
        StringHandle {
            value: StringHandleType::DOT_TERMINATED_STRING | self.value,
        }
    }

    /// A plain handle for the string starting `prefix_byte_length` bytes into this one.
    ///
    /// Used to address the remainder of a string after a prefix of known length, e.g. the
    /// simple name that follows a namespace. Must only be called on a plain handle.
    #[must_use]
    pub fn suffix_raw(&self, prefix_byte_length: u32) -> Self {
        debug_assert!(self.string_kind() == StringKind::Plain);
        StringHandle::from_offset(self.heap_offset() + prefix_byte_length)
    }

    /// How the referenced bytes are to be read.
    #[must_use]
    pub fn string_kind(&self) -> StringKind {
        // Constructors and narrowing only produce the four defined flavours.
        match self.value >> HEAP_OFFSET_BIT_COUNT {
            0 => StringKind::Plain,
            1 => StringKind::DotTerminated,
            4 => StringKind::Virtual,
            _ => StringKind::WinRTPrefixed,
        }
    }

    /// Returns `true` for projected names.
    ///
    /// WinRT-prefixed strings have physical backing and are not virtual here, even though they
    /// carry the virtual bit once widened into a [`Handle`].
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.string_kind() == StringKind::Virtual
    }

    /// Returns `true` for offset `0` in the plain or dot-terminated flavour.
    ///
    /// Virtual and WinRT-prefixed handles are never nil, matching [`Handle::is_nil`] on the
    /// widened handle.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        (self.value & !StringHandleType::NON_VIRTUAL_TYPE_MASK) == 0
    }

    /// The offset into the `#Strings` heap. Not defined for virtual handles.
    #[must_use]
    pub fn heap_offset(&self) -> u32 {
        debug_assert!(!self.is_virtual());
        self.value & HEAP_OFFSET_MASK
    }

    /// The projected name of a virtual handle.
    ///
    /// Returns `None` if the stored index does not name a projected string, which only
    /// happens for handles rebuilt from unchecked tokens. Not defined for non-virtual handles.
    #[must_use]
    pub fn virtual_index(&self) -> Option<StringVirtualIndex> {
        debug_assert!(self.is_virtual());
        StringVirtualIndex::from_repr(self.value & HEAP_OFFSET_MASK)
    }
}

impl From<StringHandle> for Handle {
    fn from(handle: StringHandle) -> Self {
        let vtype = ((handle.value & TOKEN_VIRTUAL_BIT) >> ROW_ID_BIT_COUNT) as u8
            | HandleType::STRING
            | ((handle.value & StringHandleType::NON_VIRTUAL_TYPE_MASK) >> HEAP_OFFSET_BIT_COUNT)
                as u8;

        Handle::new(vtype, handle.value & HEAP_OFFSET_MASK)
    }
}

impl TryFrom<Handle> for StringHandle {
    type Error = Error;

    /// Accepts the four string flavours and rejects the reserved encodings.
    fn try_from(handle: Handle) -> Result<Self> {
        let vtype = handle.vtype();
        if (vtype & !(VIRTUAL_BIT | NON_VIRTUAL_STRING_TYPE_MASK)) != HandleType::STRING {
            return Err(invalid_cast!("StringHandle", vtype));
        }

        let kind = ((vtype & VIRTUAL_BIT) >> 5) | (vtype & NON_VIRTUAL_STRING_TYPE_MASK);
        if StringKind::from_repr(kind).is_none() {
            return Err(invalid_cast!("StringHandle", vtype));
        }

        Ok(StringHandle {
            value: u32::from(kind) << HEAP_OFFSET_BIT_COUNT | handle.offset(),
        })
    }
}

impl SpecificHandle for StringHandle {
    const KIND: HandleKind = HandleKind::String;

    fn is_nil(&self) -> bool {
        StringHandle::is_nil(self)
    }
}

impl fmt::Debug for StringHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.string_kind() {
            StringKind::Virtual => match self.virtual_index() {
                Some(index) => write!(f, "StringHandle(virtual {index:?})"),
                None => write!(
                    f,
                    "StringHandle(virtual index: {})",
                    self.value & HEAP_OFFSET_MASK
                ),
            },
            kind => write!(f, "StringHandle({:?}, offset: 0x{:x})", kind, self.heap_offset()),
        }
    }
}
