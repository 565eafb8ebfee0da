use anyhow::{Context, Result};
use getarg::ArgumentTable;
use std::fmt::Write as _;

/// One `name=value` or bare `name` per line, then `positional: X` lines.
pub fn render_text(table: &ArgumentTable) -> String {
    let mut out = String::new();
    for (name, value) in table.iter() {
        match value {
            Some(value) => {
                let _ = writeln!(out, "{name}={value}");
            }
            None => {
                let _ = writeln!(out, "{name}");
            }
        }
    }
    for arg in table.positionals() {
        let _ = writeln!(out, "positional: {arg}");
    }
    out
}

pub fn render_json(table: &ArgumentTable) -> Result<String> {
    let mut out =
        serde_json::to_string_pretty(&table.snapshot()).context("failed to serialize table")?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_flags_then_positionals() {
        let table = ArgumentTable::parse(["getarg", "--a=1", "run", "-b", "-a=2"]);
        assert_eq!(render_text(&table), "-a=2\n-b\npositional: run\n");
    }

    #[test]
    fn json_uses_null_for_bare_flags() {
        let table = ArgumentTable::parse(["getarg", "-b"]);
        let value: serde_json::Value = serde_json::from_str(&render_json(&table).unwrap()).unwrap();
        assert_eq!(value["flags"][0]["name"], "-b");
        assert!(value["flags"][0]["value"].is_null());
        assert_eq!(value["positionals"], serde_json::json!([]));
    }
}
