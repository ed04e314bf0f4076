use super::commands::AppContext;
use abook::api::CmdResult;
use abook::error::Result;

pub type Handler = fn(&mut AppContext, &[&str]) -> Result<CmdResult>;

pub struct CommandSpec {
    /// Every spelling that selects this command, lowercase
    pub names: &'static [&'static str],
    pub usage: &'static str,
    pub about: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&count)
    }
}

/// Ordered list of commands, built once at startup.
pub struct CommandTable {
    entries: Vec<CommandSpec>,
}

impl CommandTable {
    pub fn new(entries: Vec<CommandSpec>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.entries.iter()
    }

    /// Finds the command a line starts with, ignoring ASCII case. When several
    /// names match ("phone" and "phone add") the longest wins. Returns the
    /// remaining words as arguments.
    ///
    /// `line` must already have its whitespace collapsed to single spaces.
    pub fn resolve<'a>(&self, line: &'a str) -> Option<(&CommandSpec, Vec<&'a str>)> {
        let mut best: Option<(&CommandSpec, &'static str)> = None;
        for spec in &self.entries {
            for &name in spec.names {
                let longer = best.map_or(true, |(_, current)| name.len() > current.len());
                if longer && starts_with_command(line, name) {
                    best = Some((spec, name));
                }
            }
        }

        best.map(|(spec, name)| {
            let args = line[name.len()..].split_whitespace().collect();
            (spec, args)
        })
    }
}

fn starts_with_command(line: &str, name: &str) -> bool {
    let Some(head) = line.get(..name.len()) else {
        return false;
    };
    let rest = &line[name.len()..];
    head.eq_ignore_ascii_case(name) && (rest.is_empty() || rest.starts_with(' '))
}

/// Collapses runs of whitespace and trims both ends.
pub fn normalize(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut AppContext, _: &[&str]) -> Result<CmdResult> {
        Ok(CmdResult::default())
    }

    fn spec(names: &'static [&'static str]) -> CommandSpec {
        CommandSpec {
            names,
            usage: "",
            about: "",
            min_args: 0,
            max_args: 3,
            handler: noop,
        }
    }

    fn table() -> CommandTable {
        CommandTable::new(vec![
            spec(&["phone"]),
            spec(&["phone add"]),
            spec(&["show all", "show"]),
            spec(&["good bye", "exit", "."]),
        ])
    }

    fn resolve<'a>(table: &CommandTable, line: &'a str) -> Option<(&'static str, Vec<&'a str>)> {
        table
            .resolve(line)
            .map(|(spec, args)| (spec.names[0], args))
    }

    #[test]
    fn longest_name_wins_regardless_of_order() {
        let table = table();
        assert_eq!(
            resolve(&table, "phone add Bob 1234567890"),
            Some(("phone add", vec!["Bob", "1234567890"]))
        );
        assert_eq!(resolve(&table, "phone Bob"), Some(("phone", vec!["Bob"])));
    }

    #[test]
    fn matching_ignores_case_but_keeps_argument_case() {
        let table = table();
        assert_eq!(
            resolve(&table, "PHONE Add McBob 1234567890"),
            Some(("phone add", vec!["McBob", "1234567890"]))
        );
    }

    #[test]
    fn name_must_end_at_word_boundary() {
        let table = table();
        assert_eq!(resolve(&table, "phones Bob"), None);
        assert_eq!(resolve(&table, "showall"), None);
        assert_eq!(resolve(&table, "show all"), Some(("show all", vec![])));
        assert_eq!(resolve(&table, "show 3"), Some(("show all", vec!["3"])));
    }

    #[test]
    fn aliases_resolve_to_same_command() {
        let table = table();
        for line in ["good bye", "exit", "."] {
            assert_eq!(resolve(&table, line).map(|(n, _)| n), Some("good bye"));
        }
        assert_eq!(resolve(&table, "hello"), None);
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  phone\t add   Bob  "), "phone add Bob");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn arity_bounds() {
        let bounded = CommandSpec {
            min_args: 1,
            max_args: 2,
            ..spec(&["x"])
        };
        assert!(!bounded.accepts(0));
        assert!(bounded.accepts(1));
        assert!(bounded.accepts(2));
        assert!(!bounded.accepts(3));
    }
}
