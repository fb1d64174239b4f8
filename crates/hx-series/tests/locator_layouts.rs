use std::fs;
use std::path::Path;
use std::sync::Arc;

use hx_core::KpiRegistry;
use hx_series::{NumericTimestepOrder, SeriesLocator, read_last_value, read_series};
use tempfile::tempdir;

fn write_dat(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn locator() -> SeriesLocator {
    SeriesLocator::new(Arc::new(KpiRegistry::standard()))
}

#[test]
fn absent_directories_are_not_errors() {
    let dir = tempdir().unwrap();
    assert_eq!(locator().locate(dir.path(), "Tin_air").unwrap(), None);
}

#[test]
fn picks_lexically_last_file() {
    let dir = tempdir().unwrap();
    let post = dir.path().join("postProcessing/Tin_air");
    write_dat(&post.join("0/surfaceFieldValue.dat"), "1 300\n");
    write_dat(&post.join("200/surfaceFieldValue.dat"), "201 301\n");
    write_dat(&post.join("1000/surfaceFieldValue.dat"), "1001 302\n");
    write_dat(&post.join("200/notes.txt"), "ignored\n");

    let found = locator().locate(dir.path(), "Tin_air").unwrap().unwrap();
    assert_eq!(found, post.join("200/surfaceFieldValue.dat"));
}

#[test]
fn numeric_ordering_is_pluggable() {
    let dir = tempdir().unwrap();
    let post = dir.path().join("postProcessing/Tin_air");
    write_dat(&post.join("200/surfaceFieldValue.dat"), "201 301\n");
    write_dat(&post.join("1000/surfaceFieldValue.dat"), "1001 302\n");

    let found = locator()
        .with_ordering(Arc::new(NumericTimestepOrder))
        .locate(dir.path(), "Tin_air")
        .unwrap()
        .unwrap();
    assert_eq!(found, post.join("1000/surfaceFieldValue.dat"));
}

#[test]
fn flat_layout_wins_over_region_layout() {
    let dir = tempdir().unwrap();
    let post = dir.path().join("postProcessing");
    write_dat(&post.join("Tout_air/0/surfaceFieldValue.dat"), "1 350\n");
    // Newer by name, but in the lower-priority layout.
    write_dat(&post.join("air/Tout_air/9999/surfaceFieldValue.dat"), "1 999\n");

    let found = locator().locate(dir.path(), "Tout_air").unwrap().unwrap();
    assert_eq!(found, post.join("Tout_air/0/surfaceFieldValue.dat"));
    assert_eq!(read_last_value(&found).unwrap(), Some(350.0));
}

#[test]
fn empty_flat_layout_falls_through_to_region_layout() {
    let dir = tempdir().unwrap();
    let post = dir.path().join("postProcessing");
    fs::create_dir_all(post.join("Tout_porous/0")).unwrap();
    write_dat(&post.join("Tout_porous/0/log.txt"), "not a series\n");
    write_dat(&post.join("porous/Tout_porous/0/volFieldValue.dat"), "1 410\n2 412\n");

    let found = locator().locate(dir.path(), "Tout_porous").unwrap().unwrap();
    assert_eq!(found, post.join("porous/Tout_porous/0/volFieldValue.dat"));
    assert_eq!(read_series(&found).unwrap().len(), 2);
}

#[cfg(unix)]
#[test]
fn symlinked_series_files_are_found() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("archive/Tin_air.dat");
    write_dat(&target, "1 300\n2 301\n");
    let link = dir.path().join("postProcessing/Tin_air/0/surfaceFieldValue.dat");
    fs::create_dir_all(link.parent().unwrap()).unwrap();
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let found = locator().locate(dir.path(), "Tin_air").unwrap().unwrap();
    assert_eq!(found, link);
    assert_eq!(read_series(&found).unwrap().len(), 2);
}

#[cfg(unix)]
#[test]
fn dangling_symlinks_are_ignored() {
    let dir = tempdir().unwrap();
    let link = dir.path().join("postProcessing/Tin_air/0/surfaceFieldValue.dat");
    fs::create_dir_all(link.parent().unwrap()).unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone.dat"), &link).unwrap();

    assert_eq!(locator().locate(dir.path(), "Tin_air").unwrap(), None);
}

#[test]
fn unregistered_kpis_are_never_resolved() {
    let dir = tempdir().unwrap();
    write_dat(
        &dir.path().join("postProcessing/Tout_solid/0/surfaceFieldValue.dat"),
        "1 500\n",
    );
    assert_eq!(locator().locate(dir.path(), "Tout_solid").unwrap(), None);
}

#[test]
fn custom_extension() {
    let dir = tempdir().unwrap();
    write_dat(
        &dir.path().join("postProcessing/Pin_air/0/surfaceFieldValue.xy"),
        "1 101325\n",
    );
    assert_eq!(locator().locate(dir.path(), "Pin_air").unwrap(), None);
    assert!(
        locator()
            .with_extension("xy")
            .locate(dir.path(), "Pin_air")
            .unwrap()
            .is_some()
    );
}
