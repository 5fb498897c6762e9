//! `keeper list` and `keeper plan` against real backup directories

use crate::common::fixtures::DUMP_SIZE;
use crate::common::BackupFixture;
use crate::keeper;
use anyhow::Result;

#[test]
fn test_plan_json_simple_policy() -> Result<()> {
    let fixture = BackupFixture::new()?;
    let names = fixture.seed_nightlies(5)?;
    fixture.configure_policy("none")?;

    let result = keeper!(fixture, "plan", "--policy", "simple:3", "--json").assert_success()?;
    let plan = result.json()?;

    assert_eq!(plan["policy"], "simple:3");
    assert_eq!(plan["anchor"], "2024-03-31T02:00:00Z");

    let keep: Vec<&str> = plan["keep"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    let delete: Vec<&str> = plan["delete"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();

    // Newest first on both sides
    assert_eq!(keep, vec![names[0].as_str(), names[1].as_str(), names[2].as_str()]);
    assert_eq!(delete, vec![names[3].as_str(), names[4].as_str()]);
    assert_eq!(plan["reclaimed_bytes"], 2 * DUMP_SIZE as u64);
    assert!(plan.get("verdicts").is_none());

    // Planning never deletes
    assert_eq!(fixture.dumps()?.len(), 5);
    Ok(())
}

#[test]
fn test_plan_uses_configured_policy() -> Result<()> {
    let fixture = BackupFixture::new()?;
    fixture.seed_nightlies(20)?;
    fixture.configure_policy("smart:daily=2,weekly=2")?;

    let plan = keeper!(fixture, "plan", "--json").assert_success()?.json()?;

    assert_eq!(plan["policy"], "smart:2,2,0,0");
    // Days 0 and 1, plus the newest dump in weekly slot 1 (day 7)
    assert_eq!(plan["keep"].as_array().unwrap().len(), 3);
    assert_eq!(plan["delete"].as_array().unwrap().len(), 17);
    Ok(())
}

#[test]
fn test_plan_explain_lists_reasons() -> Result<()> {
    let fixture = BackupFixture::new()?;
    fixture.seed_nightlies(3)?;
    fixture.configure_policy("smart:1,1,0,0")?;

    let result = keeper!(fixture, "plan", "--explain").assert_success()?;
    assert!(result.contains_stdout("daily#0"));
    assert!(result.contains_stdout("weekly#0"));
    assert!(result.contains_stdout("DELETE"));

    let plan = keeper!(fixture, "plan", "--explain", "--json")
        .assert_success()?
        .json()?;
    let verdicts = plan["verdicts"].as_array().unwrap();
    assert_eq!(verdicts.len(), 3);
    // Listing order is by name, so oldest first
    assert_eq!(verdicts[0]["keep"], false);
    assert_eq!(verdicts[1]["keep"], false);
    assert_eq!(verdicts[2]["keep"], true);
    assert_eq!(verdicts[2]["reasons"].as_array().unwrap().len(), 2);
    Ok(())
}

#[test]
fn test_plan_empty_directory() -> Result<()> {
    let fixture = BackupFixture::new()?;
    fixture.configure_policy("simple:2")?;

    let result = keeper!(fixture, "plan").assert_success()?;
    assert!(result.contains_stdout("No backups found"));

    let plan = keeper!(fixture, "plan", "--json").assert_success()?.json()?;
    assert!(plan["anchor"].is_null());
    assert_eq!(plan["keep"].as_array().unwrap().len(), 0);
    assert_eq!(plan["delete"].as_array().unwrap().len(), 0);
    Ok(())
}

#[test]
fn test_malformed_policy_keeps_everything() -> Result<()> {
    let fixture = BackupFixture::new()?;
    fixture.seed_nightlies(4)?;
    fixture.configure_policy("smart:lots")?;

    let result = keeper!(fixture, "plan", "--json").assert_success()?;
    assert!(result.contains_stderr("Invalid retention policy"));

    let plan = result.json()?;
    assert_eq!(plan["policy"], "none");
    assert_eq!(plan["keep"].as_array().unwrap().len(), 4);
    assert_eq!(plan["delete"].as_array().unwrap().len(), 0);
    Ok(())
}

#[test]
fn test_invalid_policy_flag_is_an_error() -> Result<()> {
    let fixture = BackupFixture::new()?;
    fixture.seed_nightlies(2)?;

    let result = keeper!(fixture, "plan", "--policy", "weekly:2").assert_failure()?;
    assert!(result.contains_stderr("Invalid --policy"));
    Ok(())
}

#[test]
fn test_dir_flag_overrides_config() -> Result<()> {
    let fixture = BackupFixture::new()?;
    fixture.seed_nightlies(2)?;
    // Default config points at ./backups, relative to the fixture root
    let result = keeper!(fixture, "plan", "--json").assert_success()?;
    assert_eq!(result.json()?["keep"].as_array().unwrap().len(), 2);

    let other = fixture.root().join("elsewhere");
    std::fs::create_dir(&other)?;
    let other = other.display().to_string();
    let plan = keeper!(fixture, "plan", "--dir", &other, "--json")
        .assert_success()?
        .json()?;
    assert_eq!(plan["keep"].as_array().unwrap().len(), 0);
    Ok(())
}

#[test]
fn test_missing_backup_dir_fails() -> Result<()> {
    let fixture = BackupFixture::new()?;
    let missing = fixture.root().join("missing").display().to_string();

    let result = keeper!(fixture, "plan", "--dir", &missing).assert_failure()?;
    assert!(result.contains_stderr("Failed to list backups"));
    Ok(())
}

#[test]
fn test_list_shows_dumps_not_sidecars() -> Result<()> {
    let fixture = BackupFixture::new()?;
    let names = fixture.seed_nightlies(3)?;

    let result = keeper!(fixture, "list").assert_success()?;
    for name in &names {
        assert!(result.contains_stdout(name));
    }
    assert!(!result.contains_stdout(".sha256"));
    assert!(result.contains_stdout("2024-03-31 02:00:00"));

    // Newest first
    let first = result.stdout.find(names[0].as_str()).unwrap();
    let last = result.stdout.find(names[2].as_str()).unwrap();
    assert!(first < last);
    Ok(())
}
