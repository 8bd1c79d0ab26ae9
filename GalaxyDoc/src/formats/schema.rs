//! Declarative record layouts
//!
//! The `DocumentHeader` layout is an ordered list of field descriptors.
//! Both the writer and the reader walk the same list, so the on-disk
//! contract lives in one place. All integers are little-endian and fields
//! are packed with no alignment padding.

/// How a single field is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Constant bytes, validated on read
    Magic(&'static [u8]),
    /// Unsigned 32-bit integer
    U32,
    /// Opaque fixed-width bytes
    Bytes(usize),
    /// `u32` count followed by NUL-terminated CP437 strings
    ZStringList,
    /// `u16` byte length followed by CP437 bytes
    PrefixedString,
    /// Fixed-width CP437 string stored with its characters reversed
    ReversedString(usize),
    /// `u32` row count followed by rows of a nested layout
    Table(&'static [FieldDescriptor]),
}

impl FieldKind {
    /// Largest length (bytes or elements) the field can express
    #[must_use]
    pub fn max_len(self) -> usize {
        match self {
            FieldKind::Magic(bytes) => bytes.len(),
            FieldKind::U32 => 4,
            FieldKind::Bytes(width) | FieldKind::ReversedString(width) => width,
            FieldKind::PrefixedString => usize::from(u16::MAX),
            FieldKind::ZStringList | FieldKind::Table(_) => u32::MAX as usize,
        }
    }
}

/// A named field in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor { name, kind }
}

/// "H2CS" file magic
pub const HEADER_MAGIC: &[u8] = b"H2CS";

/// Game tag, "S2" stored reversed and NUL-padded
pub const GAME_MAGIC: &[u8] = b"2S\0\0";

/// Width of the opaque build stamp
pub const BUILD_STAMP_SIZE: usize = 8;

/// Width of the opaque reserved block
pub const RESERVED_SIZE: usize = 20;

/// Width of an attribute locale tag (e.g. `enUS`)
pub const LOCALE_SIZE: usize = 4;

/// One row of the header attribute table
pub const ATTRIBUTE_LAYOUT: &[FieldDescriptor] = &[
    field("key", FieldKind::PrefixedString),
    field("locale", FieldKind::ReversedString(LOCALE_SIZE)),
    field("value", FieldKind::PrefixedString),
];

/// The `DocumentHeader` record
pub const HEADER_LAYOUT: &[FieldDescriptor] = &[
    field("magic", FieldKind::Magic(HEADER_MAGIC)),
    field("format_version", FieldKind::U32),
    field("game_magic", FieldKind::Magic(GAME_MAGIC)),
    field("game_format_version", FieldKind::U32),
    field("build_stamp", FieldKind::Bytes(BUILD_STAMP_SIZE)),
    field("reserved", FieldKind::Bytes(RESERVED_SIZE)),
    field("dependencies", FieldKind::ZStringList),
    field("attributes", FieldKind::Table(ATTRIBUTE_LAYOUT)),
];

/// Size of the fixed-width prefix of a layout (up to the first variable field)
#[must_use]
pub fn fixed_prefix_len(layout: &[FieldDescriptor]) -> usize {
    layout
        .iter()
        .map_while(|f| match f.kind {
            FieldKind::Magic(bytes) => Some(bytes.len()),
            FieldKind::U32 => Some(4),
            FieldKind::Bytes(width) | FieldKind::ReversedString(width) => Some(width),
            FieldKind::ZStringList | FieldKind::PrefixedString | FieldKind::Table(_) => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fixed_prefix() {
        // magic + version + game + version + stamp + reserved
        assert_eq!(fixed_prefix_len(HEADER_LAYOUT), 4 + 4 + 4 + 4 + 8 + 20);
    }

    #[test]
    fn test_field_names_unique() {
        for layout in [HEADER_LAYOUT, ATTRIBUTE_LAYOUT] {
            let mut names: Vec<_> = layout.iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), layout.len());
        }
    }
}
