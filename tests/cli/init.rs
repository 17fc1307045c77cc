use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, TRANSLATIONS_FILE, stderr, stdout};

#[test]
fn test_init_creates_config_and_stubs() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Created .traksrc.json"));
    assert!(out.contains(&format!("Created {}", TRANSLATIONS_FILE)));
    assert!(out.contains("Created src/traks.js"));

    let config: Value = serde_json::from_str(&test.read_file(".traksrc.json")?)
        .context("config should be valid JSON")?;
    assert_eq!(config["langs"], serde_json::json!(["en"]));
    assert_eq!(config["translationsFile"], TRANSLATIONS_FILE);
    assert_eq!(config["signatureNormalizerVersion"], 0);

    let translations = test.read_translations()?;
    assert!(translations.ends_with("export default {\n}\n"));

    let import_file = test.read_file("src/traks.js")?;
    assert!(import_file.contains("import translations from './traks-translations';"));
    assert!(import_file.contains("default_lang: \"en\""));

    Ok(())
}

#[test]
fn test_init_fails_if_config_exists() -> Result<()> {
    let test = CliTest::with_file(".traksrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error: .traksrc.json already exists"));
    assert_eq!(test.read_file(".traksrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_keeps_existing_translations_file() -> Result<()> {
    let existing = "export default {\n}\n";
    let test = CliTest::with_file(TRANSLATIONS_FILE, existing)?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(&format!("note: {} already exists", TRANSLATIONS_FILE)));
    assert_eq!(test.read_translations()?, existing);

    Ok(())
}

#[test]
fn test_init_project_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file("src/app.jsx", "export const App = () => <T>Hello</T>;\n")?;

    let output = test.update()?;
    assert!(stdout(&output).contains("1 new"));
    assert!(test.read_translations()?.contains("\"en\": () => <O>Hello</O>,"));

    Ok(())
}
