use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pollbox").unwrap();
        cmd.arg("--config")
            .arg(self.dir.path().join("config.toml"))
            .arg("--data-dir")
            .arg(self.dir.path().join("data"))
            .arg("--no-color");
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().arg("--json").args(args).output().unwrap();
        assert!(
            output.status.success(),
            "pollbox {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn create_poll(&self, poll_type: &str, options: &[&str]) -> Value {
        let mut args = vec!["poll", "create", "Lunch?", "--type", poll_type];
        for option in options {
            args.push("-o");
            args.push(*option);
        }
        self.json(&args)
    }
}

fn option_id(poll: &Value, index: usize) -> String {
    poll["options"][index]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_help() {
    Command::cargo_bin("pollbox")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("poll"));
}

#[test]
fn test_init_creates_config() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));

    let content = std::fs::read_to_string(ws.dir.path().join("config.toml")).unwrap();
    assert!(content.contains("binary_labels"));

    ws.cmd().args(["config", "validate"]).assert().success();
}

#[test]
fn test_binary_poll_gets_yes_no() {
    let ws = Workspace::new();
    let poll = ws.create_poll("binary", &["A", "B", "C"]);

    assert_eq!(poll["type"], "binary");
    assert_eq!(poll["options"][0]["text"], "Yes");
    assert_eq!(poll["options"][1]["text"], "No");
}

#[test]
fn test_single_poll_revote_replaces() {
    let ws = Workspace::new();
    let poll = ws.create_poll("single", &["Pizza", "Sushi"]);
    let poll_id = poll["id"].as_str().unwrap();
    let user = ws.json(&["user", "create", "alice"]);
    let user_id = user["id"].as_str().unwrap();

    ws.json(&["vote", "cast", poll_id, option_id(&poll, 0).as_str(), "--user", user_id]);
    let receipt = ws.json(&["vote", "cast", poll_id, option_id(&poll, 1).as_str(), "--user", user_id]);
    assert_eq!(receipt["retracted"], 1);

    let results = ws.json(&["poll", "results", poll_id]);
    assert_eq!(results["total_votes"], 1);
    assert_eq!(results["results"][0]["count"], 0);
    assert_eq!(results["results"][1]["count"], 1);
}

#[test]
fn test_anonymous_vote() {
    let ws = Workspace::new();
    let poll = ws.create_poll("binary", &[]);
    let poll_id = poll["id"].as_str().unwrap();

    let receipt = ws.json(&["vote", "cast", poll_id, option_id(&poll, 0).as_str()]);

    let username = receipt["created_user"]["username"].as_str().unwrap();
    assert!(username.starts_with("anonymous_"));
    assert_eq!(receipt["created_user"]["id"], receipt["user_id"]);
}

#[test]
fn test_multi_duplicate_rejected() {
    let ws = Workspace::new();
    let poll = ws.create_poll("multi", &["A", "B", "C"]);
    let poll_id = poll["id"].as_str().unwrap();
    let user = ws.json(&["user", "create", "bob"]);
    let user_id = user["id"].as_str().unwrap();
    let a = option_id(&poll, 0);

    ws.json(&["vote", "cast", poll_id, a.as_str(), option_id(&poll, 1).as_str(), "--user", user_id]);
    ws.cmd()
        .args(["vote", "cast", poll_id, a.as_str(), "--user", user_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already been voted for"));

    let results = ws.json(&["poll", "results", poll_id]);
    assert_eq!(results["total_votes"], 2);
}

#[test]
fn test_vote_on_closed_poll_fails() {
    let ws = Workspace::new();
    let poll = ws.create_poll("single", &["A", "B"]);
    let poll_id = poll["id"].as_str().unwrap();

    ws.json(&["poll", "update", poll_id, "--close"]);
    ws.cmd()
        .args(["vote", "cast", poll_id, option_id(&poll, 0).as_str()])
        .assert()
        .failure();

    assert_eq!(ws.json(&["user", "list"]), Value::Array(vec![]));
}

#[test]
fn test_option_floor() {
    let ws = Workspace::new();
    let poll = ws.create_poll("single", &["A", "B"]);
    let poll_id = poll["id"].as_str().unwrap();

    ws.cmd()
        .args(["option", "delete", poll_id, option_id(&poll, 0).as_str(), "--yes"])
        .assert()
        .failure();

    let added = ws.json(&["option", "add", poll_id, "C"]);
    let added_id = added["id"].as_str().unwrap();
    ws.cmd()
        .args(["option", "delete", poll_id, added_id, "--yes"])
        .assert()
        .success();
}

#[test]
fn test_comment_thread() {
    let ws = Workspace::new();
    let poll = ws.create_poll("single", &["A", "B"]);
    let poll_id = poll["id"].as_str().unwrap();
    let user = ws.json(&["user", "create", "carol"]);
    let user_id = user["id"].as_str().unwrap();

    let root = ws.json(&["comment", "add", poll_id, "first!", "--user", user_id]);
    let root_id = root["id"].as_str().unwrap();
    ws.json(&[
        "comment", "add", poll_id, "reply", "--user", user_id, "--reply-to", root_id,
    ]);

    let tree = ws.json(&["comment", "list", poll_id]);
    assert_eq!(tree.as_array().unwrap().len(), 1);
    assert_eq!(tree[0]["replies"][0]["content"], "reply");

    let deleted = ws.json(&["comment", "delete", poll_id, root_id, "--user", user_id, "--yes"]);
    assert_eq!(deleted.as_array().unwrap().len(), 2);
    assert_eq!(ws.json(&["comment", "list", poll_id]), Value::Array(vec![]));
}

#[test]
fn test_deep_thread_json_is_capped() {
    let ws = Workspace::new();
    let poll = ws.create_poll("single", &["A", "B"]);
    let poll_id = poll["id"].as_str().unwrap();
    let user = ws.json(&["user", "create", "dave"]);
    let user_id = user["id"].as_str().unwrap();

    // 52 comments in one chain: reply depth 51, one past the JSON limit
    let mut parent: Option<String> = None;
    for i in 0..52 {
        let content = format!("level {}", i);
        let mut args = vec!["comment", "add", poll_id, content.as_str(), "--user", user_id];
        if let Some(id) = parent.as_deref() {
            args.push("--reply-to");
            args.push(id);
        }
        let comment = ws.json(&args);
        parent = Some(comment["id"].as_str().unwrap().to_string());
    }

    ws.cmd()
        .args(["--json", "comment", "list", poll_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nested deeper than 50 levels"));

    ws.cmd()
        .args(["comment", "list", poll_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("level 51"));
}

#[test]
fn test_invalid_poll_type() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["poll", "create", "Bad", "--type", "ranked", "-o", "A", "-o", "B"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_poll() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["poll", "show", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
