//! Stub files written by `traks init` and by `traks update` on first run.

use std::path::{Component, Path, PathBuf};

const TRANSLATIONS_HEADER: &str = r##"import React from 'react';
const O = React.Fragment;

// This is your translations file. `traks update` parses and rewrites it, adding
// new translations and refreshing the underscore-prefixed fields so that they
// match your source code. Keep these rules in mind:
//  - Everything before the export statement is kept as-is; add imports, helper
//    functions or anything else you need up here.
//  - Everything inside the export statement except function bodies is rebuilt.
//    Edits there are overwritten by `traks update` (comments included) or make
//    the file corrupt, in which case `traks update` refuses to touch it.
//  - Hash-prefixed fields such as "#comment" are the exception. Put them before
//    the underscore-prefixed fields and they are preserved.
//  - Function bodies may be a block or an expression; both of these are valid:
//       "en": () => {
//           return <O>Hello world!</O>
//       },
//       "en": () => <O>Hello world!</O>,
//    Once a translation exists `traks update` leaves its body alone. New
//    one-line translations are added in expression form.
//  - Run `traks update` before committing; it validates the file.
//
"##;

/// Initial contents of the translations file.
pub fn translations_stub(import_file: &str) -> String {
    format!(
        "{}// See the import file ({}) for how translations are used.\n\nexport default {{\n}}\n",
        TRANSLATIONS_HEADER, import_file
    )
}

const IMPORT_BODY: &str = r##"
let setup, module;
/* `traks build` replaces the "TRAKS_COMPILE_TIME_MAGICK_CONST__*" string literals
 * at compile time, depending on whether a bake language is set. */
if ("TRAKS_COMPILE_TIME_MAGICK_CONST__IS_BAKED") {
	setup = require('traks/setup-baked');
	module = setup({
		translations,
		lang: "TRAKS_COMPILE_TIME_MAGICK_CONST__LANG",
		set_lang: (lang) => {
			console.log("set lang", lang); // handle language changes of baked builds here
		}
	});
} else {
	setup = require('traks/setup');

	/* Missing translations are wrapped in this component. It is optional. */
	const TranslationMissing = function(props) {
		return <span style={{backgroundColor:"#f0f",color:"#ff0"}}>{props.children || null}</span>;
	}

	module = setup({
		translations,
		default_lang: DEFAULT_LANG,
		translation_missing_component: TranslationMissing,
	});
}

const { T, TraksProvider, TraksConsumer } = module;

/* Exports:
 *   T: the translation component, for example:
 *       <T>translate me</T>                                       (plain text)
 *       <T>will you <i>translate me</i>?</T>                      (markup is fine)
 *       <T>You have {count} unread message(s)</T>                 ('count' becomes a dependency)
 *       <T>Hello, <World/></T>                                    ('World' becomes a dependency)
 *       <T context='file'>Save</T> <T context='people'>Save</T>   (same text, different translations)
 *       <T deps={[count]}>You have several messages</T>           (extra dependencies)
 *      Rules:
 *       - <T>-tags cannot be nested
 *       - no inline functions in JSX expressions:
 *            <T>{x=>x}</T> is rejected
 *            but <T><input placeholder="my placeholder" onChange={on_change_fn}/></T> is fine
 *       - the only attributes are 'deps', 'context' and 'key'
 *
 *   TraksProvider: wrap your application in it; <T> does not work outside of it
 *
 *   TraksConsumer: passes 'lang' and set_lang(lang) props to its child
 */
export { T, TraksProvider, TraksConsumer }
"##;

/// Initial contents of the import file the application uses.
pub fn import_stub(import_file: &str, translations_file: &str, default_lang: &str) -> String {
    let body = IMPORT_BODY.replace(
        "DEFAULT_LANG",
        &serde_json::Value::String(default_lang.to_string()).to_string(),
    );
    format!(
        "import React from 'react';\nimport translations from '{}';\n{}",
        relative_import(import_file, translations_file),
        body
    )
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Module specifier importing `to` from the file `from`, without extension.
pub fn relative_import(from: &str, to: &str) -> String {
    let from_dir = normalize(Path::new(from).parent().unwrap_or(Path::new("")));
    let to = normalize(Path::new(to));

    let from_parts: Vec<Component> = from_dir.components().collect();
    let to_parts: Vec<Component> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
    parts.extend(
        to_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().to_string()),
    );
    if let Some(last) = parts.last_mut() {
        let stem = Path::new(last.as_str())
            .file_stem()
            .map(|s| s.to_string_lossy().to_string());
        if let Some(stem) = stem {
            *last = stem;
        }
    }

    let joined = parts.join("/");
    if joined.starts_with('.') {
        joined
    } else {
        format!("./{}", joined)
    }
}
