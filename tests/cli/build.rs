use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, TRANSLATIONS_FILE, stderr, stdout};

const APP: &str = "const a = <T>foo</T>;\nconst b = <T key={id}>Hi {name}</T>;\n";

/// A project with an up-to-date translations file in "da" and "en", where
/// "foo" has a Danish translation.
fn baked_project() -> Result<CliTest> {
    let test = CliTest::with_file("src/app.jsx", APP)?;
    test.write_file(".traksrc.json", r#"{ "langs": ["da", "en"] }"#)?;
    test.update()?;
    let translations = test
        .read_translations()?
        .replace("\"da\": () => <O>foo</O>,", "\"da\": () => <O>fu</O>,");
    test.write_file(TRANSLATIONS_FILE, &translations)?;
    Ok(test)
}

#[test]
fn test_build_tags_fragments() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", APP)?;

    let output = test.command().args(["build", "src/app.jsx"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "const a = <T k=\"e5410e122e8c\" deps={[]}/>;\n\
         const b = <T k=\"f03784233a38\" deps={[name]} key={id}/>;\n"
    );

    Ok(())
}

#[test]
fn test_build_keep_children() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo</T>;\n")?;

    let output = test
        .command()
        .args(["build", "--keep-children", "src/app.jsx"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "const a = <T k=\"e5410e122e8c\" deps={[]}>foo</T>;\n"
    );

    Ok(())
}

#[test]
fn test_build_writes_out_dir() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", "const a = <T>foo</T>;\n")?;

    let output = test
        .command()
        .args(["build", "--out-dir", "dist", "src/app.jsx"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Wrote dist/src/app.jsx (tagged)"));
    assert_eq!(
        test.read_file("dist/src/app.jsx")?,
        "const a = <T k=\"e5410e122e8c\" deps={[]}/>;\n"
    );
    assert_eq!(test.read_file("src/app.jsx")?, "const a = <T>foo</T>;\n");

    Ok(())
}

#[test]
fn test_build_bakes_language() -> Result<()> {
    let test = baked_project()?;

    let output = test
        .command()
        .args(["build", "--bake-lang", "da", "src/app.jsx"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "const a = <T>fu</T>;\nconst b = <T key={id}>Hi {name}</T>;\n"
    );

    Ok(())
}

#[test]
fn test_build_bake_lang_from_env() -> Result<()> {
    let test = baked_project()?;

    let output = test
        .command()
        .env("TRAKS_BAKE_LANG", "da")
        .args(["build", "src/app.jsx"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("const a = <T>fu</T>;\n"));

    Ok(())
}

#[test]
fn test_build_bakes_translations_file() -> Result<()> {
    let test = baked_project()?;

    let output = test
        .command()
        .args(["build", "--bake-lang", "da", TRANSLATIONS_FILE])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let baked = stdout(&output);
    assert!(baked.starts_with("import React from 'react';\n"));
    assert!(baked.ends_with("export default {\n}\n"));

    Ok(())
}

#[test]
fn test_build_lookup_miss_fails() -> Result<()> {
    let test = baked_project()?;

    let output = test
        .command()
        .args(["build", "--bake-lang", "de", "src/app.jsx"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("translation not found"));

    let output = test
        .command()
        .args(["build", "--bake-lang", "de", "--fallback-lang", "en", "src/app.jsx"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("const a = <T>foo</T>;\n"));

    Ok(())
}

#[test]
fn test_build_bake_requires_translations_file() -> Result<()> {
    let test = CliTest::with_file("src/app.jsx", APP)?;

    let output = test
        .command()
        .args(["build", "--bake-lang", "en", "src/app.jsx"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("does not exist"));

    Ok(())
}

#[test]
fn test_build_replaces_magic_strings() -> Result<()> {
    let test = baked_project()?;
    test.write_file(
        "src/setup.js",
        "if (\"TRAKS_COMPILE_TIME_MAGICK_CONST__IS_BAKED\") {\n\tlang = \"TRAKS_COMPILE_TIME_MAGICK_CONST__LANG\";\n}\n",
    )?;

    let output = test
        .command()
        .args(["build", "--bake-lang", "da", "src/setup.js"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "if (true) {\n\tlang = \"da\";\n}\n");

    let output = test.command().args(["build", "src/setup.js"]).output()?;
    assert_eq!(
        stdout(&output),
        "if (false) {\n\tlang = \"TRAKS_COMPILE_TIME_MAGICK_CONST__LANG\";\n}\n"
    );

    Ok(())
}
