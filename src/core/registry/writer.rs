use serde_json::Value;

use super::Registry;
use crate::error::{TraksError, TraksResult};

const NEW_MARKER: &str = "\"_new\": true, // FIXME remove this line when translation is done";
const DELETED_MARKER: &str = "\"_deleted\": true, // FIXME translation has no references; delete this entire section if you no longer need it";

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

impl Registry {
    /// Serialize the registry. Parsing the output yields the same registry.
    pub fn render(&self, indent: &str) -> String {
        let tab = |n: usize| indent.repeat(n);
        let mut out = String::with_capacity(self.preamble.len() + self.entries.len() * 128);
        out.push_str(&self.preamble);
        out.push_str("export default {\n");

        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("{}{}: {{\n", tab(1), quote(&entry.key)));

            for field in &entry.metadata {
                out.push_str(&format!("{}{},\n", tab(2), field));
            }
            if entry.is_new {
                out.push_str(&format!("{}{}\n", tab(2), NEW_MARKER));
            }
            if entry.is_deleted {
                out.push_str(&format!("{}{}\n", tab(2), DELETED_MARKER));
            }
            if !entry.context.is_empty() {
                out.push_str(&format!("{}\"_context\": {},\n", tab(2), quote(&entry.context)));
            }
            if !entry.refs.is_empty() {
                let refs: Vec<String> = entry.refs.iter().map(|r| quote(&r.to_string())).collect();
                out.push_str(&format!("{}\"_refs\": [{}],\n", tab(2), refs.join(", ")));
            }

            let params = entry.deps.join(", ");
            for translation in &entry.translations {
                out.push_str(&format!(
                    "{}{}: ({}) => {},\n",
                    tab(2),
                    quote(&translation.lang),
                    params,
                    translation.body.code()
                ));
            }

            out.push_str(&format!("{}}},\n", tab(1)));
        }

        out.push_str("}\n");
        out
    }

    /// Serialize the registry for a baked build.
    ///
    /// Each entry resolves to the first of `langs` it has a translation for.
    /// Entries whose translation is inlined at its use sites are left out.
    pub fn render_baked(&self, langs: &[String], indent: &str) -> TraksResult<String> {
        let mut out = String::with_capacity(self.preamble.len() + self.entries.len() * 64);
        out.push_str(&self.preamble);
        out.push_str("export default {\n");

        for entry in &self.entries {
            let translation = langs
                .iter()
                .find_map(|lang| entry.translation(lang))
                .ok_or_else(|| TraksError::LookupMiss {
                    key: entry.key.clone(),
                    langs: langs.to_vec(),
                    file: self.path.clone(),
                    line: entry.line,
                })?;
            if translation.body.is_inlinable() {
                continue;
            }
            out.push_str(&format!(
                "{}{}: ({}) => {},\n",
                indent,
                quote(&entry.key),
                entry.deps.join(", "),
                translation.body.code()
            ));
        }

        out.push_str("}\n");
        Ok(out)
    }
}
