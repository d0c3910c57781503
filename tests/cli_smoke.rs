use std::process::Command;

use serde_json::json;

fn gradebook() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gradebook"));
    cmd.env_remove("GRADEBOOK_GPA_SCALE").env_remove("RUST_LOG");
    cmd
}

#[test]
fn convert_prints_letter_and_gpa() {
    let output = gradebook()
        .args(["--gpa-scale", "5", "convert", "--percentage", "91"])
        .output()
        .expect("run gradebook");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("A-"), "{stdout}");
    assert!(stdout.contains("4.63"), "{stdout}");
}

#[test]
fn invalid_scale_fails() {
    let output = gradebook()
        .args(["--gpa-scale", "0", "convert", "--percentage", "91"])
        .output()
        .expect("run gradebook");
    assert!(!output.status.success());
}

#[test]
fn overall_accepts_missing_courses() {
    let output = gradebook()
        .args(["overall", "--gpa", "4.0", "-", "3.0", "null", "2.0"])
        .output()
        .expect("run gradebook");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.trim(), "Overall GPA 3.00");
}

#[test]
fn export_writes_dated_csv() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input_path = dir.path().join("course.json");
    let doc = json!({
        "courseCode": "CHEM/2",
        "courseTitle": "Chemistry",
        "assignments": [
            {
                "id": "0c22f1f1-9184-4fd4-9b21-28c68a6a89dc",
                "title": "Assignment 1",
                "maxPoints": 100
            }
        ],
        "students": [
            {
                "id": "3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2",
                "name": "Kiara Patel",
                "email": "kiara@example.edu"
            }
        ],
        "records": [
            {
                "studentId": "3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2",
                "assignmentId": "0c22f1f1-9184-4fd4-9b21-28c68a6a89dc",
                "state": "graded",
                "at": "2026-02-02T10:00:00Z",
                "score": 88
            }
        ]
    });
    std::fs::write(&input_path, doc.to_string()).expect("write input");

    let output = gradebook()
        .arg("export")
        .arg("--input")
        .arg(&input_path)
        .arg("--out-dir")
        .arg(dir.path())
        .args(["--now", "2026-03-01T12:00:00Z"])
        .output()
        .expect("run gradebook");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = std::fs::read_to_string(dir.path().join("CHEM_2_grades_2026-03-01.csv"))
        .expect("export file");
    assert!(written.starts_with('\u{FEFF}'));
    assert!(written.contains("Assignment 1 (100)"));
    assert!(written.ends_with("Kiara Patel,kiara@example.edu,88,88/100,88%,3.30"));
}
