//! End-to-end tests for the `fix-line-endings` binary.

mod common;
use common::prelude::*;

#[test]
fn test_converts_crlf_in_place() {
    let fixture = TestFixture::new().with_file("build.sh", "#!/bin/sh\r\necho hi\r\n");

    fixture.fix_line_endings().arg("build.sh").assert().code(0);

    fixture.child("build.sh").assert("#!/bin/sh\necho hi\n");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(fixture.path().join("build.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn test_missing_argument_exits_1() {
    let fixture = TestFixture::new();

    fixture.fix_line_endings().assert().code(1);
}

#[test]
fn test_missing_file_exits_1() {
    let fixture = TestFixture::new();

    fixture
        .fix_line_endings()
        .arg("nope.sh")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}
