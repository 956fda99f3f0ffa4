//! Black-box specs driving `rexd submit --local` against a scratch
//! filesystem standing in for the target host (spec.md §8, scenarios
//! S1/S3/S5).

use crate::prelude::*;

fn submit_local(work: &Workdir, program_path: &std::path::Path, extra: &[&str]) -> RunAssert {
    let run_dir = work.path().join("run");
    let media_root = work.path().join("media");

    let mut args: Vec<String> = vec![
        "submit".into(),
        "--local".into(),
        "--interpreter-path".into(),
        "/bin/sh".into(),
        "--program".into(),
        program_path.display().to_string(),
        "--remote-filename".into(),
        "job.sh".into(),
        "--local-workdir".into(),
        run_dir.display().to_string(),
        "--media-root".into(),
        media_root.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));

    rexd().args(args).passes()
}

#[test]
fn local_submit_exit_code_zero_reports_success_status() {
    let work = Workdir::new();
    let program = work.file("job.sh", "#!/bin/sh\nexit 0\n");

    let run = submit_local(&work, &program, &[]);
    run.stdout_has("\"status\": \"success\"");
}

#[test]
fn local_submit_nonzero_exit_reports_failure_status() {
    let work = Workdir::new();
    let program = work.file("job.sh", "#!/bin/sh\nexit 1\n");

    let run = submit_local(&work, &program, &[]);
    run.stdout_has("\"status\": \"failure\"");
}

#[test]
fn local_submit_captures_matching_output_file() {
    let work = Workdir::new();
    let program = work.file("job.sh", "#!/bin/sh\necho produced > out.txt\n");

    let run = submit_local(&work, &program, &["--pattern", "*.txt"]);
    let stdout = run.stdout();
    assert!(
        stdout.contains("\"result_ids\""),
        "expected a result_ids field in: {stdout}"
    );
    assert!(
        !stdout.contains("\"result_ids\": []"),
        "expected at least one captured result, got: {stdout}"
    );
}

#[test]
fn local_submit_prints_stdout_logs() {
    let work = Workdir::new();
    let program = work.file("job.sh", "#!/bin/sh\necho line-one\necho line-two\n");

    let run = submit_local(&work, &program, &["--log-policy", "total"]);
    run.stdout_has("line-one");
}
