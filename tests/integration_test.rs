use exam_title_tool::models::{Mode, OutcomeStatus, SkipReason};
use exam_title_tool::orchestrator::{commit, plan, RunParams};
use exam_title_tool::{decode, encode, App, Config, TitleDocument};
use std::fs;
use std::path::{Path, PathBuf};

fn bank_xml(big5: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wm:questionbank xmlns:wm="http://www.sun.net.tw/WisdomMaster">
  <wm:title>{}</wm:title>
  <wm:question id="1">題目</wm:question>
</wm:questionbank>
"#,
        encode(big5)
    )
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn params(root: &Path, mode: Mode) -> RunParams {
    RunParams {
        root: root.to_path_buf(),
        mode,
        extensions: vec!["xml".to_string()],
        output_dir: root.join("exam_02_xml_todolist"),
    }
}

fn big5_of(path: &Path) -> String {
    let doc = TitleDocument::open(path).unwrap();
    decode(doc.find_title().unwrap()).unwrap().big5().to_string()
}

#[test]
fn test_rename_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "A/y.xml", &bank_xml("第1課"));
    write(root, "A/sub/z.xml", &bank_xml("第2課"));
    write(root, "B/x.xml", &bank_xml("第二課"));
    write(root, "loose.xml", &bank_xml("散"));

    let first = commit(&plan(&params(root, Mode::Rename)).unwrap());
    assert_eq!(first.changed, 3);
    assert_eq!(first.skipped, 1);
    assert_eq!(first.errored, 0);
    assert!(root.join("A/A_y.xml").exists());
    assert!(root.join("A/sub/A_z.xml").exists());
    assert!(root.join("B/B_x.xml").exists());
    assert!(root.join("loose.xml").exists());

    let second_plan = plan(&params(root, Mode::Rename)).unwrap();
    assert_eq!(second_plan.pending(), 0);
    let second = commit(&second_plan);
    assert_eq!(second.changed, 0);
    assert_eq!(second.skipped, 4);
}

#[test]
fn test_update_title_prefixes_and_reruns_safely() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "G/a.xml", &bank_xml("第一章"));
    write(root, "G/done.xml", &bank_xml("G_已處理"));
    write(root, "G/empty.xml", "<bank/>");
    write(root, "G/broken.xml", "<a><b></a>");

    let plan1 = plan(&params(root, Mode::UpdateTitle)).unwrap();
    assert_eq!(plan1.pending(), 1);
    let summary = commit(&plan1);
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.outcomes.len(), 4);

    assert_eq!(big5_of(&root.join("G/a.xml")), "G_第一章");
    let rewritten = fs::read_to_string(root.join("G/a.xml")).unwrap();
    assert!(rewritten.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    assert!(rewritten.contains(r#"s:6:"GB2312";s:19:"COPY_COPY_undefined""#));
    assert!(rewritten.contains(r#"<wm:question id="1">題目</wm:question>"#));

    // 未修改的文件保持原样
    assert_eq!(
        fs::read_to_string(root.join("G/done.xml")).unwrap(),
        bank_xml("G_已處理")
    );

    let plan2 = plan(&params(root, Mode::UpdateTitle)).unwrap();
    assert_eq!(plan2.pending(), 0);
    assert!(plan2
        .entries
        .iter()
        .any(|e| e.reason == Some(SkipReason::AlreadyPrefixed)));
}

#[test]
fn test_build_index_orders_numerically() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    // 发现顺序为 A/y.xml, B/x.xml, C/z.xml
    write(root, "B/x.xml", &bank_xml("第二課"));
    write(root, "A/y.xml", &bank_xml("第10課"));
    write(root, "C/z.xml", &bank_xml("第1課"));

    let index_plan = plan(&params(root, Mode::BuildIndex)).unwrap();
    let titles: Vec<&str> = index_plan.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["第1課", "第二課", "第10課"]);
    // 索引模式不修改文件
    assert!(root.join("B/x.xml").exists());

    let summary = commit(&index_plan);
    assert_eq!(summary.changed, 3);
    let index_path: PathBuf = summary.index_path.clone().unwrap();
    let csv = fs::read_to_string(index_path).unwrap();
    let lines: Vec<&str> = csv.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "C,z.xml,第1課,,,,");
    assert_eq!(lines[2], "B,x.xml,第二課,,,,");
    assert_eq!(lines[3], "A,y.xml,第10課,,,,");
}

#[test]
fn test_build_index_keeps_unreadable_as_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "G/ok.xml", &bank_xml("第一章"));
    write(root, "G/bad.xml", "<a><b></a>");

    let summary = commit(&plan(&params(root, Mode::BuildIndex)).unwrap());
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.skipped, 1);
    let bad = summary
        .outcomes
        .iter()
        .find(|o| o.path.ends_with("bad.xml"))
        .unwrap();
    assert_eq!(bad.status, OutcomeStatus::Skipped);
}

#[test]
fn test_app_run_writes_audit_log() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "exam_01_math/G/a.xml", &bank_xml("第一章"));

    let config = Config {
        base_dir: dir.path().to_path_buf(),
        log_dir: dir.path().join("log"),
        output_dir: dir.path().join("out"),
        ..Config::default()
    };
    let app = App::new(config);
    let summary = app
        .run("exam_01_math", Mode::Rename, |plan| plan.pending() == 1)
        .unwrap()
        .unwrap();
    assert_eq!(summary.changed, 1);

    let logs: Vec<_> = fs::read_dir(dir.path().join("log")).unwrap().collect();
    assert_eq!(logs.len(), 1);
}

#[test]
fn test_write_failure_does_not_block_batch() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "G/a.xml", &bank_xml("第一章"));
    write(root, "G/b.xml", &bank_xml("第二章"));
    write(root, "G/c.xml", &bank_xml("第三章"));

    let update_plan = plan(&params(root, Mode::UpdateTitle)).unwrap();
    assert_eq!(update_plan.pending(), 3);

    // 计划之后、执行之前文件消失
    fs::remove_file(root.join("G/b.xml")).unwrap();

    let summary = commit(&update_plan);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.changed, 2);
    assert_eq!(summary.errored, 1);

    let statuses: Vec<OutcomeStatus> = summary.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            OutcomeStatus::Rewritten,
            OutcomeStatus::Failed,
            OutcomeStatus::Rewritten
        ]
    );
    assert_eq!(big5_of(&root.join("G/a.xml")), "G_第一章");
    assert_eq!(big5_of(&root.join("G/c.xml")), "G_第三章");
}

#[test]
fn test_rerun_returns_summary_of_skips() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "exam_01_math/G/a.xml", &bank_xml("第一章"));

    let config = Config {
        base_dir: dir.path().to_path_buf(),
        log_dir: dir.path().join("log"),
        output_dir: dir.path().join("out"),
        ..Config::default()
    };
    let app = App::new(config);
    let first = app
        .run("exam_01_math", Mode::UpdateTitle, |_| true)
        .unwrap()
        .unwrap();
    assert_eq!(first.changed, 1);

    let second = app
        .run("exam_01_math", Mode::UpdateTitle, |_| true)
        .unwrap()
        .unwrap();
    assert_eq!(second.changed, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(second.outcomes[0].detail, "a.xml -> 跳过 (已有前缀)");
}
