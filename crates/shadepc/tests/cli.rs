use std::fs;
use std::process::Command;

use tempfile::TempDir;

const SHADER: &str = r#"
vertex {
    layout(location = 1) in vec4 a_Color;
    layout(location = 0) in vec3 a_Position;
    out vec4 v_Color;
    void main() { v_Color = a_Color; }
}

fragment {
    in vec4 v_Color;
    layout(location = 0) out vec4 o_Color;
    void main() { o_Color = v_Color; }
}
"#;

fn shadepc() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_shadepc"));
    command.env_remove("SHADEPC_FORMAT").env("RUST_LOG", "off");
    command
}

#[test]
fn prints_summary_for_valid_shader() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("basic.glsl");
    fs::write(&path, SHADER).unwrap();

    let output = shadepc()
        .arg(&path)
        .output()
        .expect("failed to run shadepc");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("vertex stage"));
    assert!(stdout.contains("vertex buffer layout (stride 28 bytes)"));
}

#[test]
fn json_output_is_parseable() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("basic.glsl");
    fs::write(&path, SHADER).unwrap();

    let output = shadepc()
        .arg(&path)
        .env("SHADEPC_FORMAT", "json")
        .output()
        .expect("failed to run shadepc --format json");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let elements = value["vertex_buffer_layout"]["elements"].as_array().unwrap();
    assert_eq!(elements[0]["name"], "a_Position");
    assert_eq!(elements[1]["offset"], 12);
}

#[test]
fn stage_errors_become_exit_codes() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("fragment_only.glsl");
    fs::write(&path, "fragment {\n out vec4 color;\n}\n").unwrap();

    let status = shadepc()
        .arg(&path)
        .status()
        .expect("failed to run shadepc");
    assert_eq!(status.code(), Some(1));

    fs::write(&path, "vertex {\n in vec3 p;\n}\nfragment {\n in vec4 c;\n}\n").unwrap();
    let status = shadepc()
        .arg(&path)
        .status()
        .expect("failed to rerun shadepc");
    assert_eq!(status.code(), Some(4));
}

#[test]
fn missing_input_fails() {
    let root = TempDir::new().unwrap();
    let status = shadepc()
        .arg(root.path().join("absent.glsl"))
        .status()
        .expect("failed to run shadepc");
    assert!(!status.success());
}
