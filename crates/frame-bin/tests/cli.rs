use std::fs;
use std::process::Command;

fn ppm_header(bytes: &[u8]) -> (String, String) {
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(32)]).into_owned();
    let mut fields = text.split_whitespace();
    let magic = fields.next().unwrap_or_default().to_string();
    let dims = format!("{} {}", fields.next().unwrap_or_default(), fields.next().unwrap_or_default());
    (magic, dims)
}

#[test]
fn renders_file_to_ppm() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "hello\tworld\nsecond line\n").unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_framedemo"))
        .current_dir(dir.path())
        .args(["in.txt", "--cols", "20", "--lines", "4", "--cell", "6", "--height", "10"])
        .status()
        .unwrap();
    assert!(status.success());

    let bytes = fs::read(dir.path().join("frame.ppm")).unwrap();
    // 20 cells of 6 plus a 4 pixel border each side; 4 lines of 10 likewise.
    assert_eq!(ppm_header(&bytes), ("P6".to_string(), "128 48".to_string()));
    assert_eq!(bytes.len(), "P6\n128 48\n255\n".len() + 128 * 48 * 3);
    assert!(dir.path().join("framedemo.log").exists());
}

#[test]
fn drag_with_config_and_custom_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "one\ntwo\nthree\nfour\nfive\n").unwrap();
    fs::write(
        dir.path().join("frame.toml"),
        "[frame]\ntab_width = 4\n\n[select]\nauto_scroll = true\n",
    )
    .unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_framedemo"))
        .current_dir(dir.path())
        .args([
            "in.txt",
            "--config",
            "frame.toml",
            "--lines",
            "2",
            "--drag",
            "5,5:40,60",
            "--out",
            "sel.ppm",
        ])
        .status()
        .unwrap();
    assert!(status.success());
    let bytes = fs::read(dir.path().join("sel.ppm")).unwrap();
    assert_eq!(ppm_header(&bytes).0, "P6");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_framedemo"))
        .current_dir(dir.path())
        .arg("nope.txt")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.txt"));
    assert!(!dir.path().join("frame.ppm").exists());
}
