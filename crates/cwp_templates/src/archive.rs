//! Tarball templates.
//!
//! Archives are unpacked into a scoped temporary directory that is removed
//! when the [`tempfile::TempDir`] guard drops, on success and on every error path.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use futures_util::StreamExt;
use tar::Archive;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{TemplateError, TemplateResult};
use crate::manifest::{read_package_info, MANIFEST_FILE};
use crate::resolver::PackageReference;
use crate::specifier::guess_name_from_filename;

/// Read `{name, version}` from a tarball's manifest.
///
/// `source` is fetched over HTTP when it starts with `http`, otherwise it is
/// read from the local filesystem.
pub async fn extract_package_info(source: &str) -> TemplateResult<PackageReference> {
    let workspace = tempfile::Builder::new().prefix("cwp-template-").tempdir()?;
    debug!("Extracting {} into {:?}", source, workspace.path());

    let archive_path = if source.starts_with("http") {
        let target = workspace.path().join("template.tgz");
        download(source, &target).await?;
        target
    } else {
        PathBuf::from(source)
    };

    let unpack_dir = workspace.path().join("unpacked");
    unpack(&archive_path, &unpack_dir).map_err(|e| TemplateError::ExtractionFailed {
        source_ref: source.to_string(),
        message: e.to_string(),
    })?;

    let package_dir = find_package_root(&unpack_dir).ok_or_else(|| {
        TemplateError::ManifestNotFound(unpack_dir.join(MANIFEST_FILE))
    })?;

    read_package_info(&package_dir)
}

/// Resolve a tarball to a package reference, falling back to the file name
/// when the archive cannot be fetched, unpacked or parsed.
pub async fn resolve_tarball(source: &str) -> PackageReference {
    match extract_package_info(source).await {
        Ok(info) => {
            info!("Read template package {} from archive", info);
            info
        }
        Err(e) => {
            warn!("Could not extract the package name from the archive: {}", e);
            println!("Could not extract the package name from the archive: {}", e);

            let assumed = guess_name_from_filename(source).unwrap_or_else(|| source.to_string());
            println!("Based on the filename, assuming it is \"{}\"", assumed);
            PackageReference::new(assumed)
        }
    }
}

async fn download(url: &str, target: &Path) -> TemplateResult<()> {
    info!("Downloading {}", url);

    let response = reqwest::get(url).await?.error_for_status()?;
    let mut file = tokio::fs::File::create(target).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    Ok(())
}

fn unpack(archive_path: &Path, dest: &Path) -> TemplateResult<()> {
    let file = File::open(archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.unpack(dest)?;
    Ok(())
}

/// npm tarballs nest everything under `package/`; plain archives may not.
fn find_package_root(unpack_dir: &Path) -> Option<PathBuf> {
    if unpack_dir.join(MANIFEST_FILE).is_file() {
        return Some(unpack_dir.to_path_buf());
    }

    let nested = unpack_dir.join("package");
    if nested.join(MANIFEST_FILE).is_file() {
        return Some(nested);
    }

    std::fs::read_dir(unpack_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.is_dir() && path.join(MANIFEST_FILE).is_file())
}
