use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, TRANSLATIONS_FILE, stderr, stdout};

fn project() -> Result<CliTest> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo <b>{n}</b></T>;\n")?;
    test.write_file(".traksrc.json", r#"{ "langs": ["da", "en"] }"#)?;
    test.update()?;
    Ok(test)
}

#[test]
fn test_export_writes_document() -> Result<()> {
    let test = project()?;

    let output = test.command().args(["export", "-o", "out/export.json"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Exported 1 translation entry to out/export.json"));

    let document: Value = serde_json::from_str(&test.read_file("out/export.json")?)
        .context("export should be valid JSON")?;
    let entries = document["list"].as_array().context("list should be an array")?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["is_new"], json!(true));
    assert_eq!(entries[0]["is_deleted"], json!(false));
    assert_eq!(
        entries[0]["translations"][0],
        json!({
            "lang": "da",
            "nodes": [[
                ["TEXT", "foo "],
                ["TAG", "b", [], [["EXPR", "{n}"]]],
            ]],
        })
    );

    Ok(())
}

#[test]
fn test_import_applies_patch() -> Result<()> {
    let test = project()?;
    test.command().arg("export").output()?;

    let mut document: Value = serde_json::from_str(&test.read_file("traks-export.json")?)?;
    let key = document["list"][0]["key"].clone();
    document = json!({
        "list": [{
            "key": key,
            "is_new": false,
            "translations": [{
                "lang": "da",
                "nodes": [[["TEXT", "fu "], ["TAG", "i", [], [["EXPR", "{n}"]]]]],
            }],
        }],
    });
    test.write_file("patch.json", &serde_json::to_string_pretty(&document)?)?;

    let output = test.command().args(["import", "patch.json"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(&format!(
        "Imported 1 translation: Updated {}",
        TRANSLATIONS_FILE
    )));

    let translations = test.read_translations()?;
    assert!(translations.contains("\"da\": (n) => <O>fu <i>{n}</i></O>,"));
    assert!(translations.contains("\"en\": (n) => <O>foo <b>{n}</b></O>,"));
    assert!(!translations.contains("\"_new\""));

    // The imported file is a valid registry that is already up to date.
    let output = test.update_command().arg("--check").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_import_rejects_mismatched_patch() -> Result<()> {
    let test = project()?;
    let before = test.read_translations()?;
    let output = test.command().arg("hashes").output()?;
    let key = stdout(&output)
        .trim_end()
        .rsplit('\t')
        .next()
        .unwrap_or_default()
        .to_string();

    let patch = json!({
        "list": [{
            "key": key,
            "translations": [{ "lang": "da", "nodes": [[["TEXT", "a"]], [["TEXT", "b"]]] }],
        }],
    });
    test.write_file("patch.json", &patch.to_string())?;

    let output = test.command().args(["import", "patch.json"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("found unexpected number of <O>-tags: expected 2, found 1"));
    assert_eq!(test.read_translations()?, before);

    Ok(())
}
