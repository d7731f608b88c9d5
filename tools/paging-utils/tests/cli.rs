use std::process::{Command, Output};

fn i2v(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_i2v"))
        .args(args)
        .output()
        .expect("spawn i2v")
}

fn v2i(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_v2i"))
        .args(args)
        .output()
        .expect("spawn v2i")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn i2v_prints_vaddr_line() {
    let out = i2v(&["511", "510", "0", "0"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "VAddr: 0xffffffff80000000\n");
}

#[test]
fn i2v_sign_extension_boundaries() {
    assert_eq!(stdout(&i2v(&["0", "0", "0", "0"])), "VAddr: 0x0\n");
    assert_eq!(stdout(&i2v(&["511", "0", "0", "0"])), "VAddr: 0xffffff8000000000\n");
    assert_eq!(stdout(&i2v(&["255", "0", "0", "0"])), "VAddr: 0x7f8000000000\n");
    assert_eq!(stdout(&i2v(&["256", "0", "0", "0"])), "VAddr: 0xffff800000000000\n");
}

#[test]
fn i2v_legacy_threshold_outputs() {
    assert_eq!(
        stdout(&i2v(&["--legacy", "256", "0", "0", "0"])),
        "VAddr: 0x800000000000\n"
    );
    assert_eq!(
        stdout(&i2v(&["--legacy", "479", "0", "0", "0"])),
        "VAddr: 0xef8000000000\n"
    );
    assert_eq!(
        stdout(&i2v(&["--legacy", "480", "0", "0", "0"])),
        "VAddr: 0xfffff00000000000\n"
    );
}

#[test]
fn i2v_legacy_warns_about_non_canonical_result() {
    let out = i2v(&["--legacy", "300", "0", "0", "0"]);
    assert!(out.status.success());
    assert!(stderr(&out).contains("[WARN]"), "{}", stderr(&out));
    assert!(stderr(&out).contains("not a canonical address"));
}

#[test]
fn i2v_legacy_threshold_is_rejected_when_validating() {
    let out = i2v(&["--sign-extension", "legacy", "300", "0", "0", "0"]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("not canonical"), "{}", stderr(&out));
}

#[test]
fn i2v_out_of_range_index() {
    let out = i2v(&["0", "0", "0", "512"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("PT index 512 is out of range"), "{}", stderr(&out));

    // permissive: bit 9 of the PT index lands in the PD field
    let out = i2v(&["--permissive", "0", "0", "0", "512"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "VAddr: 0x200000\n");
}

#[test]
fn i2v_argument_errors() {
    let cases: [&[&str]; 3] = [&[], &["1", "2", "3"], &["1", "2", "3", "4", "5"]];
    for args in cases {
        let out = i2v(args);
        assert_eq!(out.status.code(), Some(1), "{args:?}");
        assert!(stdout(&out).is_empty());
        assert!(stderr(&out).contains("expected 4 arguments"), "{}", stderr(&out));
    }

    let out = i2v(&["1", "x", "3", "4"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("invalid PDP index"), "{}", stderr(&out));
}

#[test]
fn v2i_prints_five_lines() {
    let out = v2i(&["0xffffff8000000000"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "PML4 index: 511\nPDP index: 0\nPD index: 0\nPT index: 0\nPage offset: 0x0\n"
    );
}

#[test]
fn v2i_accepts_unprefixed_hex() {
    let out = v2i(&["FFFFFFFF80203ABC"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "PML4 index: 511\nPDP index: 510\nPD index: 1\nPT index: 3\nPage offset: 0xabc\n"
    );

    let out = v2i(&["0x7f8000000000"]);
    assert!(stdout(&out).starts_with("PML4 index: 255\n"));
}

#[test]
fn v2i_non_canonical() {
    let out = v2i(&["0x0000800000001000"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("not canonical"));

    let out = v2i(&["--permissive", "0x0000800000001000"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "PML4 index: 256\nPDP index: 0\nPD index: 0\nPT index: 1\nPage offset: 0x0\n"
    );
}

#[test]
fn v2i_argument_errors() {
    let out = v2i(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("expected 1 argument, got 0"), "{}", stderr(&out));

    for addr in ["0xnothex", "0x+10", "++10"] {
        let out = v2i(&[addr]);
        assert_eq!(out.status.code(), Some(1), "{addr}");
        assert!(stdout(&out).is_empty());
        assert!(stderr(&out).contains("invalid hexadecimal address"), "{}", stderr(&out));
    }
}

#[test]
fn verbose_logs_go_to_stderr() {
    let out = v2i(&["-vv", "0x1000"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "PML4 index: 0\nPDP index: 0\nPD index: 0\nPT index: 1\nPage offset: 0x0\n"
    );
    assert!(stderr(&out).contains("[DEBUG] paging_index"), "{}", stderr(&out));
}

#[test]
fn round_trip_through_both_binaries() {
    let out = i2v(&["300", "17", "42", "511"]);
    let addr = stdout(&out);
    let addr = addr.trim().trim_start_matches("VAddr: ");

    let out = v2i(&[addr]);
    assert_eq!(
        stdout(&out),
        "PML4 index: 300\nPDP index: 17\nPD index: 42\nPT index: 511\nPage offset: 0x0\n"
    );
}
