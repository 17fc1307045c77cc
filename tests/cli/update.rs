use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, TRANSLATIONS_FILE, stderr, stdout};

const APP: &str = "export const App = ({ name }) => (\n\t<div>\n\t\t<T>foo</T>\n\t\t<T>Hi {name}</T>\n\t</div>\n);\n";

#[test]
fn test_update_creates_translations_file() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", APP)?;

    let output = test.update()?;
    let out = stdout(&output);
    assert!(out.contains(&format!("Created {}", TRANSLATIONS_FILE)));
    assert!(out.contains("2 new, 0 deleted, 0 restored"));

    assert_eq!(
        test.read_export_statement()?,
        "export default {
\t\"e5410e122e8c\": {
\t\t\"_new\": true, // FIXME remove this line when translation is done
\t\t\"_refs\": [\"src/app.jsx:3\"],
\t\t\"en\": () => <O>foo</O>,
\t},

\t\"f03784233a38\": {
\t\t\"_new\": true, // FIXME remove this line when translation is done
\t\t\"_refs\": [\"src/app.jsx:4\"],
\t\t\"en\": (name) => <O>Hi {name}</O>,
\t},
}
"
    );

    Ok(())
}

#[test]
fn test_update_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", APP)?;
    test.update()?;
    let first = test.read_translations()?;

    let output = test.update()?;
    assert!(stdout(&output).contains("is up to date"));
    assert_eq!(test.read_translations()?, first);

    Ok(())
}

#[test]
fn test_update_check_reports_stale_file() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", APP)?;
    test.update()?;
    let before = test.read_translations()?;

    test.write_file("src/other.jsx", "const x = <T>bar</T>;\n")?;
    let output = test.update_command().arg("--check").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("is out of date (1 new, 0 deleted, 0 restored"));
    assert_eq!(test.read_translations()?, before);

    test.update()?;
    let output = test.update_command().arg("--check").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_update_check_without_translations_file() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", APP)?;

    let output = test.update_command().arg("--check").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(!test.root().join(TRANSLATIONS_FILE).exists());

    Ok(())
}

#[test]
fn test_update_marks_and_restores_deleted_entries() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo</T>;\n")?;
    test.write_file("src/gone.jsx", "const b = <T>bar</T>;\n")?;
    test.update()?;

    test.remove_file("src/gone.jsx")?;
    let output = test.update()?;
    assert!(stdout(&output).contains("0 new, 1 deleted, 0 restored"));
    let translations = test.read_translations()?;
    assert!(translations.contains("\"_deleted\": true, // FIXME"));
    assert!(translations.contains("\"en\": () => <O>bar</O>,"));

    test.write_file("src/back.jsx", "const b = <T>bar</T>;\n")?;
    let output = test.update()?;
    assert!(stdout(&output).contains("0 new, 0 deleted, 1 restored"));
    let translations = test.read_translations()?;
    assert!(!translations.contains("\"_deleted\""));
    assert!(translations.contains("\"_refs\": [\"src/back.jsx:1\"],"));

    Ok(())
}

#[test]
fn test_update_keeps_edited_translations_and_preamble() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo</T>;\n")?;
    test.update()?;

    let edited = test
        .read_translations()?
        .replace("\"en\": () => <O>foo</O>,", "\"en\": () => <O>foo, edited</O>,")
        .replacen("import React", "import { helper } from './helper';\nimport React", 1);
    test.write_file(crate::TRANSLATIONS_FILE, &edited)?;

    let output = test.update()?;
    assert!(stdout(&output).contains("is up to date"));
    assert_eq!(test.read_translations()?, edited);

    Ok(())
}

#[test]
fn test_update_reports_usage_error_with_code_frame() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.jsx",
        "const ok = <T>fine</T>;\nconst bad = <T>{x => x}</T>;\n",
    )?;

    let output = test.update_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("error: "), "stderr: {}", err);
    assert!(err.contains("--> src/app.jsx:2:"), "stderr: {}", err);
    assert!(err.contains("2 | const bad = <T>{x => x}</T>;"), "stderr: {}", err);
    assert!(!test.root().join(TRANSLATIONS_FILE).exists());

    Ok(())
}

#[test]
fn test_update_refuses_corrupt_translations_file() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo</T>;\n")?;
    let corrupt = "export default {\n\t\"abc\": 42,\n}\n";
    test.write_file(TRANSLATIONS_FILE, corrupt)?;

    let output = test.update_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("corrupt translations file"));
    assert_eq!(test.read_translations()?, corrupt);

    Ok(())
}

#[test]
fn test_update_respects_config_langs() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo</T>;\n")?;
    test.write_file(".traksrc.json", r#"{ "langs": ["da", "en"] }"#)?;
    test.update()?;

    let translations = test.read_translations()?;
    let da = translations.find("\"da\": () => <O>foo</O>,");
    let en = translations.find("\"en\": () => <O>foo</O>,");
    assert!(da.is_some() && en.is_some() && da < en);

    Ok(())
}
