//! Symbolic records and host-side header generation.
//!
//! The blob stores images by position; host code addresses them by name.
//! [`PackageSymbols`] carries the name/index/dimensions/format record for
//! every image plus the pack checksum, and can render them as the C header
//! the embedded runtime compiles against: an enum of resource indices, a
//! checksum define for load-time validation, and the loader glue.

use std::fmt::Write;

use crate::encode::{EncodedImage, PixelFormat};

/// One image's symbolic record: its position and shape within the blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

/// The symbol table for one resource package.
#[derive(Debug, Clone)]
pub struct PackageSymbols {
    package: String,
    checksum: u32,
    records: Vec<ResourceRecord>,
}

impl PackageSymbols {
    /// Build the symbol table from encoded images in blob order.
    ///
    /// Image names are uppercased for the generated constants; the package
    /// name is lowercased for identifiers, matching the runtime's naming
    /// convention.
    pub fn new(package: &str, checksum: u32, images: &[EncodedImage]) -> Self {
        let records = images
            .iter()
            .enumerate()
            .map(|(index, image)| ResourceRecord {
                name: sanitize(&image.name).to_uppercase(),
                index,
                width: image.width,
                height: image.height,
                format: image.format,
            })
            .collect();
        Self {
            package: sanitize(package).to_lowercase(),
            checksum,
            records,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    /// Render the C header section for this package.
    pub fn render_header(&self) -> String {
        let pkg = &self.package;
        let prefix = format!("PREZR_{}_", pkg.to_uppercase());
        let mut out = String::new();

        let _ = writeln!(
            out,
            "// ------------------------- {} -------------------------",
            pkg
        );
        let _ = writeln!(out, "#define {}CHECKSUM 0x{:X}", prefix, self.checksum);
        out.push('\n');

        let _ = writeln!(out, "typedef enum prezr_pack_{}_e {{", pkg);
        for record in &self.records {
            let _ = writeln!(
                out,
                "  {}{}, // {}x{} {:?}",
                prefix, record.name, record.width, record.height, record.format
            );
        }
        let _ = writeln!(out, "  {}COUNT", prefix);
        let _ = writeln!(out, "}} prezr_pack_{}_t;", pkg);
        out.push('\n');

        let resource_id = format!("RESOURCE_ID_{}PACK", prefix);
        let _ = writeln!(
            out,
            "#if defined(PREZR_IMPORT) || defined(PREZR_IMPORT_{}_PACK)",
            pkg.to_uppercase()
        );
        let _ = writeln!(out, "prezr_pack_t prezr_{} = {{ NULL, 0, NULL }};", pkg);
        let _ = writeln!(out, "void prezr_load_{}() {{", pkg);
        let _ = writeln!(out, "  int r = prezr_init(&prezr_{}, {});", pkg, resource_id);
        let _ = writeln!(out, "  if (r != PREZR_OK)");
        let _ = writeln!(
            out,
            "    APP_LOG(APP_LOG_LEVEL_ERROR, \"PRezr package '{}' failed with code %d\", r);",
            pkg
        );
        let _ = writeln!(out, "  if (prezr_{}.numResources != {}COUNT)", pkg, prefix);
        let _ = writeln!(
            out,
            "    APP_LOG(APP_LOG_LEVEL_ERROR, \"PRezr package '{}' resource count mismatch\");",
            pkg
        );
        let _ = writeln!(out, "}}");
        let _ = writeln!(out, "void prezr_unload_{}() {{", pkg);
        let _ = writeln!(out, "  prezr_destroy(&prezr_{});", pkg);
        let _ = writeln!(out, "}}");
        let _ = writeln!(out, "#else");
        let _ = writeln!(out, "extern prezr_pack_t prezr_{};", pkg);
        let _ = writeln!(out, "extern void prezr_load_{}();", pkg);
        let _ = writeln!(out, "extern void prezr_unload_{}();", pkg);
        let _ = writeln!(out, "#endif // PREZR_IMPORT");

        out
    }
}

/// Preamble for a generated header file that concatenates package sections.
pub fn header_preamble() -> &'static str {
    "#pragma once\n\n"
}

/// Replace characters that cannot appear in a C identifier. A leading
/// digit gets an underscore prefix so the result is usable on its own.
fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
