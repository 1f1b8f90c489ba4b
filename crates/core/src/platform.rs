//! Catalog of PE `IMAGE_FILE_MACHINE_*` codes.
//!
//! Pure lookups in both directions; no state.

/// Name returned by [`machine_type_name`] for codes missing from the catalog.
pub const UNKNOWN_MACHINE_TYPE: &str = "Unknown machine type";

/// Known machine types, in catalog order. Lookup by code returns the first match.
pub const MACHINE_TYPES: &[(&str, u32)] = &[
    ("IMAGE_FILE_MACHINE_AM33", 0x1d3),
    ("IMAGE_FILE_MACHINE_AMD64", 0x8664),
    ("IMAGE_FILE_MACHINE_ARM", 0x1c0),
    ("IMAGE_FILE_MACHINE_ARMV7", 0x1c4),
    ("IMAGE_FILE_MACHINE_EBC", 0xebc),
    ("IMAGE_FILE_MACHINE_I386", 0x14c),
    ("IMAGE_FILE_MACHINE_IA64", 0x200),
    ("IMAGE_FILE_MACHINE_M32R", 0x9041),
    ("IMAGE_FILE_MACHINE_MIPS16", 0x266),
    ("IMAGE_FILE_MACHINE_MIPSFPU", 0x366),
    ("IMAGE_FILE_MACHINE_MIPSFPU16", 0x466),
    ("IMAGE_FILE_MACHINE_POWERPC", 0x1f0),
    ("IMAGE_FILE_MACHINE_POWERPCFP", 0x1f1),
    ("IMAGE_FILE_MACHINE_R4000", 0x166),
    ("IMAGE_FILE_MACHINE_SH3", 0x1a2),
    ("IMAGE_FILE_MACHINE_SH3E", 0x1a4),
    ("IMAGE_FILE_MACHINE_SH3DSP", 0x1a3),
    ("IMAGE_FILE_MACHINE_SH4", 0x1a6),
    ("IMAGE_FILE_MACHINE_SH5", 0x1a8),
    ("IMAGE_FILE_MACHINE_THUMB", 0x1c2),
    ("IMAGE_FILE_MACHINE_WCEMIPSV2", 0x169),
    ("IMAGE_FILE_MACHINE_R3000", 0x162),
    ("IMAGE_FILE_MACHINE_R10000", 0x168),
    ("IMAGE_FILE_MACHINE_ALPHA", 0x184),
    ("IMAGE_FILE_MACHINE_ALPHA64", 0x284),
    ("IMAGE_FILE_MACHINE_CEE", 0xc0ee),
    ("IMAGE_FILE_MACHINE_TRICORE", 0x520),
    ("IMAGE_FILE_MACHINE_CEF", 0xcef),
];

/// Canonical name for a machine code, or [`UNKNOWN_MACHINE_TYPE`].
pub fn machine_type_name(code: u32) -> &'static str {
    MACHINE_TYPES
        .iter()
        .find(|(_, value)| *value == code)
        .map(|(name, _)| *name)
        .unwrap_or(UNKNOWN_MACHINE_TYPE)
}

/// Reverse lookup used when parsing configuration.
///
/// Accepts the full `IMAGE_FILE_MACHINE_*` name or its suffix (`AMD64`),
/// case-insensitively.
pub fn machine_type_code(name: &str) -> Option<u32> {
    let wanted = name.trim().to_ascii_uppercase();
    MACHINE_TYPES
        .iter()
        .find(|(catalog_name, _)| {
            *catalog_name == wanted
                || catalog_name.strip_prefix("IMAGE_FILE_MACHINE_") == Some(wanted.as_str())
        })
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve_to_names() {
        assert_eq!(machine_type_name(0x8664), "IMAGE_FILE_MACHINE_AMD64");
        assert_eq!(machine_type_name(0x14c), "IMAGE_FILE_MACHINE_I386");
        assert_eq!(machine_type_name(0xaa64), UNKNOWN_MACHINE_TYPE);
    }

    #[test]
    fn names_resolve_back_to_codes() {
        assert_eq!(machine_type_code("IMAGE_FILE_MACHINE_I386"), Some(0x14c));
        assert_eq!(machine_type_code("amd64"), Some(0x8664));
        assert_eq!(machine_type_code("x86_64"), None);
    }
}
