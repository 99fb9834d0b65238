use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const ICON_SET_DIRS: [&str; 2] = [
    "GoToShell/Assets.xcassets/AppIcon.appiconset",
    "GoToShellHelper/Assets.xcassets/AppIcon.appiconset",
];

const ICON_SIZES: [(&str, u32); 10] = [
    ("icon_16x16.png", 16),
    ("icon_16x16@2x.png", 32),
    ("icon_32x32.png", 32),
    ("icon_32x32@2x.png", 64),
    ("icon_128x128.png", 128),
    ("icon_128x128@2x.png", 256),
    ("icon_256x256.png", 256),
    ("icon_256x256@2x.png", 512),
    ("icon_512x512.png", 512),
    ("icon_512x512@2x.png", 1024),
];

/// Running `gotoshell-icon` with no arguments inside a checkout fills both
/// icon sets with correctly sized PNGs.
#[test]
fn test_default_run_writes_both_icon_sets() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let dirs = create_icon_set_dirs(temp_dir.path());

    let output = run_in(temp_dir.path(), &[]);
    assert_success(&output);

    for dir in &dirs {
        let files = fs::read_dir(dir).unwrap().count();
        assert_eq!(files, ICON_SIZES.len(), "{}", dir.display());

        for (filename, size) in ICON_SIZES {
            let icon = image::open(dir.join(filename))
                .unwrap_or_else(|e| panic!("Failed to open {filename}: {e}"));
            assert_eq!(icon.width(), size, "{filename} width");
            assert_eq!(icon.height(), size, "{filename} height");
        }
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let generated = stdout
        .lines()
        .filter(|line| line.starts_with("Generated "))
        .count();
    assert_eq!(generated, ICON_SET_DIRS.len() * ICON_SIZES.len());
    assert!(stdout.contains("icon_512x512@2x.png (1024x1024)"));
}

#[test]
fn test_second_run_is_byte_identical() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let dirs = create_icon_set_dirs(temp_dir.path());

    assert_success(&run_in(temp_dir.path(), &[]));
    let first: Vec<Vec<u8>> = read_icon_files(&dirs);

    assert_success(&run_in(temp_dir.path(), &[]));
    let second: Vec<Vec<u8>> = read_icon_files(&dirs);

    assert_eq!(first, second);
}

#[test]
fn test_missing_icon_set_directory_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_in(temp_dir.path(), &[]);

    assert!(!output.status.success(), "run without icon set directories should fail");
    assert!(!output.stderr.is_empty());
    assert!(!temp_dir.path().join("GoToShell").exists());
}

#[test]
fn test_root_contents_json_and_icns() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path().join("checkout");
    let dirs = create_icon_set_dirs(&root);
    let icns_path = temp_dir.path().join("AppIcon.icns");

    let output = run_in(
        temp_dir.path(),
        &[
            "--root",
            root.to_str().unwrap(),
            "--contents-json",
            "--icns",
            icns_path.to_str().unwrap(),
            "--color",
            "#1e293b",
        ],
    );
    assert_success(&output);

    for dir in &dirs {
        let contents = fs::read_to_string(dir.join("Contents.json")).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&contents).expect("Contents.json should contain valid JSON");

        let images = parsed["images"].as_array().unwrap();
        assert_eq!(images.len(), ICON_SIZES.len());
        assert_eq!(parsed["info"]["version"], 1);

        for image in images {
            assert_eq!(image["idiom"], "mac");
            let filename = image["filename"].as_str().unwrap();
            assert!(dir.join(filename).exists(), "{filename} listed but missing");
        }
        assert_eq!(images[9]["size"], "512x512");
        assert_eq!(images[9]["scale"], "2x");
    }

    let icns = fs::read(&icns_path).unwrap();
    assert_eq!(&icns[..4], b"icns");
}

#[test]
fn test_invalid_color_fails_before_writing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let dirs = create_icon_set_dirs(temp_dir.path());

    let output = run_in(temp_dir.path(), &["--color", "nope"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid face color"));
    for dir in &dirs {
        assert_eq!(fs::read_dir(dir).unwrap().count(), 0);
    }
}

fn create_icon_set_dirs(root: &Path) -> Vec<PathBuf> {
    ICON_SET_DIRS
        .iter()
        .map(|dir| {
            let path = root.join(dir);
            fs::create_dir_all(&path).expect("Failed to create icon set directory");
            path
        })
        .collect()
}

fn read_icon_files(dirs: &[PathBuf]) -> Vec<Vec<u8>> {
    dirs.iter()
        .flat_map(|dir| ICON_SIZES.iter().map(move |(name, _)| dir.join(name)))
        .map(|path| fs::read(path).unwrap())
        .collect()
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gotoshell-icon"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run gotoshell-icon")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("gotoshell-icon command failed");
    }
}
