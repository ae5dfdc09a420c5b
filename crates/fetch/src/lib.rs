pub mod error;
pub mod ftp;
pub mod http;

use std::{
    fs::{self, File},
    io::{self, copy},
    path::Path,
};

/// Extracts a zip archive in place, mirroring the layout the archive itself
/// describes. Used for both NaPTAN's `NaPTAN.xml.zip` and TNDS's per-region
/// bundles.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> io::Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out_path = destination.join(relative);

        if entry.name().ends_with('/') {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        copy(&mut entry, &mut out_file)?;
    }
    Ok(())
}
