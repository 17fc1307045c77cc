use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_migrate_rekeys_translations() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.jsx",
        "const a = <T>foo\nbar</T>;\nconst b = <T>foo</T>;\n",
    )?;
    test.update()?;
    let translations = test.read_translations()?;
    assert!(translations.contains("\"a831df127868\": {"));

    let output = test.command().args(["migrate", "--to", "1"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Mapped key a831df127868 to 88b29c555c9c"));
    assert!(!out.contains("Mapped key e5410e122e8c"));
    assert!(out.contains("\"signatureNormalizerVersion\": 1"));

    let translations = test.read_translations()?;
    assert!(!translations.contains("a831df127868"));
    assert!(translations.contains("\"88b29c555c9c\": {"));
    assert!(translations.contains("\"e5410e122e8c\": {"));

    let output = test
        .update_command()
        .args(["--check", "--normalizer-version", "1"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_migrate_requires_up_to_date_translations() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo\nbar</T>;\n")?;
    test.update()?;
    test.write_file("src/new.jsx", "const c = <T>brand\nnew</T>;\n")?;

    let output = test.command().args(["migrate", "--to", "1"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = test
        .update_command()
        .args(["--check", "--normalizer-version", "1"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_migrate_fails_for_unmapped_entry() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo\nbar</T>;\n")?;
    test.update()?;
    let before = test.read_translations()?;
    test.write_file("src/app.jsx", "const a = <T>something else</T>;\n")?;

    let output = test.command().args(["migrate", "--to", "1"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("could not be mapped"));
    assert_eq!(test.read_translations()?, before);

    Ok(())
}
