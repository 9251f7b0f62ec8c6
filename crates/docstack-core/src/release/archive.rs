use std::fs::File;
use std::path::Path;

use anyhow::Context;

/// Unpack an xz-compressed tarball into `dest`.
///
/// Entries that would escape `dest` are skipped by [`tar::Archive::unpack`].
pub fn unpack_tar_xz(archive: &Path, dest: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create extract directory: {}", dest.display()))?;

    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
    let decoder = xz2::read::XzDecoder::new(file);
    let mut tarball = tar::Archive::new(decoder);
    tarball.set_preserve_permissions(true);
    tarball
        .unpack(dest)
        .with_context(|| format!("Failed to unpack {} into {}", archive.display(), dest.display()))
}
