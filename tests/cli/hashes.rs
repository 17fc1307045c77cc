use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_hashes_lists_fragment_keys() -> Result<()> {
    let test = CliTest::with_file(
        "src/b.jsx",
        "const b = <T>foo\nbar</T>;\nconst c = <T>Hi {name}</T>;\n",
    )?;
    test.write_file("src/a.jsx", "const a = <T>foo</T>;\n")?;

    let output = test.command().arg("hashes").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    insta::assert_snapshot!(stdout(&output), @"
    src/a.jsx:1\te5410e122e8c
    src/b.jsx:1\ta831df127868
    src/b.jsx:3\tf03784233a38
    ");

    Ok(())
}

#[test]
fn test_hashes_honors_normalizer_override() -> Result<()> {
    let test = CliTest::with_file("src/a.jsx", "const b = <T>foo\nbar</T>;\n")?;

    let output = test
        .command()
        .args(["hashes", "--normalizer-version", "1"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "src/a.jsx:1\t88b29c555c9c\n");

    Ok(())
}

#[test]
fn test_hashes_rejects_unknown_normalizer() -> Result<()> {
    let test = CliTest::with_file("src/a.jsx", "const a = <T>foo</T>;\n")?;

    let output = test
        .command()
        .args(["hashes", "--normalizer-version", "9"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error:"));

    Ok(())
}

#[test]
fn test_hashes_skips_excluded_dirs() -> Result<()> {
    let test = CliTest::with_file("src/a.jsx", "const a = <T>foo</T>;\n")?;
    test.write_file("src/node_modules/lib/x.jsx", "const x = <T>bar</T>;\n")?;

    let output = test.command().arg("hashes").output()?;
    assert_eq!(stdout(&output), "src/a.jsx:1\te5410e122e8c\n");

    Ok(())
}
