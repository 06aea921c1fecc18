use clap::{Args, ValueEnum};
use flamethrower_loc::{Histogram, StringTable, StringsBinary};
use itertools::Itertools;
use miette::{miette, Context, Result};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{cmp::Ordering, fmt::Display, path::PathBuf};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    #[default]
    Semantic,
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, String, Vec<Change>, Vec<Change>),
}

impl Change {
    fn modified(section: &str, name: &str) -> Change {
        Change::Modified(section.into(), name.into(), Vec::new(), Vec::new())
    }

    pub fn with_children(&mut self, children: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, vec, _) => {
                vec.extend(children);
                vec.sort();
                Ok(())
            }
            _ => Err(miette!("tried to add children to an addition or removal")),
        }
    }

    pub fn with_related(&mut self, related: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, _, vec) => {
                vec.extend(related);
                Ok(())
            }
            _ => Err(miette!("tried to add related to an addition or removal")),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Change::Added(..) => 0,
            Change::Removed(..) => 1,
            Change::Modified(..) => 2,
            Change::Comparison(..) => 3,
            Change::Context(_) => 4,
        }
    }
}

impl Ord for Change {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Change::Added(k, v), Change::Added(ok, ov))
            | (Change::Removed(k, v), Change::Removed(ok, ov)) => (k, v).cmp(&(ok, ov)),
            (Change::Comparison(k, old, new), Change::Comparison(ok, oold, onew)) => {
                (k, old, new).cmp(&(ok, oold, onew))
            }
            (Change::Context(values), Change::Context(other_values)) => values.cmp(other_values),
            (Change::Modified(k, v, children, related), Change::Modified(ok, ov, oc, or)) => {
                (k, v, children, related).cmp(&(ok, ov, oc, or))
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Change {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(_, v) => {
                writeln!(f, "✅ {}", v.green())
            }
            Change::Removed(_, v) => {
                writeln!(f, "❌ {}", v.red())
            }
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(values) => {
                writeln!(f, "{}", values.iter().map(|l| format!(" {}", l)).join("\n"))
            }
            Change::Modified(_, v, children, related) => {
                let mut txt_final = related.iter().map(|c| format!("{}", c)).join("");

                let mut section = String::new();
                let mut current_key = String::new();
                for c in children {
                    let key = match c {
                        Change::Added(key, _) => format!("* {} added:\n", key),
                        Change::Removed(key, _) => format!("* {} removed:\n", key),
                        Change::Modified(key, _, _, _) => format!("* {} modified:\n", key),
                        _ => current_key.clone(),
                    };

                    if current_key != key {
                        if !section.is_empty() {
                            txt_final.push_str(
                                &section.split('\n').map(|l| "  ".to_string() + l).join("\n"),
                            );
                            txt_final.push('\n');
                        }
                        section.clear();

                        txt_final.push_str(&key);
                        current_key = key
                    }

                    section.push_str(&format!("{}\n", c));
                }

                txt_final.push_str(&section.split('\n').map(|l| "  ".to_string() + l).join("\n"));

                writeln!(f, "🔃 {}", v.blue())?;
                writeln!(
                    f,
                    "{}",
                    txt_final
                        .split('\n')
                        .filter(|l| l.trim().len() > 1)
                        .map(|l| "  ".to_string() + l)
                        .join("\n")
                )
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// The histogram chunk the strings were written against
    #[arg(short = 'H', long, value_name = "FILE")]
    histogram: PathBuf,

    /// The histogram chunk of the right side, when it differs
    #[arg(long, value_name = "FILE")]
    right_histogram: Option<PathBuf>,

    /// An input strings binary chunk
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input strings binary chunk
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t=Mode::Semantic)]
    mode: Mode,
}

impl DiffArgs {
    fn inline_changes(old: &str, new: &str) -> Vec<String> {
        let diff = TextDiff::from_chars(old, new);

        let mut comparison = Vec::new();
        for op in diff.ops().iter() {
            for change in diff.iter_inline_changes(op) {
                let mut context = String::new();
                for (emphasized, value) in change.iter_strings_lossy() {
                    if emphasized {
                        if change.tag() == ChangeTag::Insert {
                            context.push_str(&format!("{}", value.green().underline()));
                        } else {
                            context.push_str(&format!("{}", value.red().underline()));
                        }
                    } else {
                        context.push_str(&format!("{}", value.dimmed()));
                    }
                }
                comparison.push(context);
            }
        }
        comparison
    }

    fn handle_strings(&self, left: &StringTable, right: &StringTable) -> Vec<Change> {
        let mut result = Vec::new();

        right
            .keys()
            .filter(|k| !left.contains_key(*k))
            .map(|k| Change::Added("entries".into(), format!("{:08X}", k)))
            .for_each(|c| result.push(c));

        left.keys()
            .filter(|k| !right.contains_key(*k))
            .map(|k| Change::Removed("entries".into(), format!("{:08X}", k)))
            .for_each(|c| result.push(c));

        left.iter()
            .filter_map(|(k, old)| right.get(k).map(|new| (k, old, new)))
            .filter(|(_, old, new)| old != new)
            .sorted_by_key(|(k, _, _)| **k)
            .map(|(k, old, new)| {
                let context = if self.mode == Mode::Full {
                    Self::inline_changes(old, new)
                } else {
                    Vec::new()
                };
                Change::Modified(
                    "entries".into(),
                    format!("{:08X}", k),
                    Vec::new(),
                    vec![Change::Context(context)],
                )
            })
            .for_each(|c| result.push(c));

        result
    }

    fn handle_chunk(
        &self,
        name: &str,
        left: &StringsBinary,
        right: &StringsBinary,
    ) -> Result<Option<Change>> {
        let mut result: Option<Change> = None;

        if left.len() != right.len() {
            result
                .get_or_insert_with(|| Change::modified("chunk", name))
                .with_related(vec![Change::Comparison(
                    "entries".into(),
                    left.len().to_string(),
                    right.len().to_string(),
                )])?;
        }

        if self.mode == Mode::Full {
            if left.chunk_size() != right.chunk_size() {
                result
                    .get_or_insert_with(|| Change::modified("chunk", name))
                    .with_related(vec![Change::Comparison(
                        "chunk size".into(),
                        left.chunk_size().to_string(),
                        right.chunk_size().to_string(),
                    )])?;
            }

            if left.header() != right.header() {
                result
                    .get_or_insert_with(|| Change::modified("chunk", name))
                    .with_related(vec![Change::Comparison(
                        "header".into(),
                        left.header().to_string(),
                        right.header().to_string(),
                    )])?;
            }
        }

        let changes = self.handle_strings(left.strings(), right.strings());
        if !changes.is_empty() {
            result
                .get_or_insert_with(|| Change::modified("chunk", name))
                .with_children(changes)?;
        }

        Ok(result)
    }

    pub fn handle(&self) -> Result<()> {
        let left_histogram = Histogram::load(&self.histogram)
            .context(format!("path: {}", &self.histogram.display()))?;
        let right_histogram = match &self.right_histogram {
            Some(path) => {
                Histogram::load(path).context(format!("path: {}", path.display()))?
            }
            None => left_histogram.clone(),
        };

        let left = StringsBinary::load(&self.left, &left_histogram)
            .context(format!("path: {}", &self.left.display()))?;
        let right = StringsBinary::load(&self.right, &right_histogram)
            .context(format!("path: {}", &self.right.display()))?;

        let difference = self.handle_chunk(&self.left.to_string_lossy(), &left, &right)?;

        if let Some(d) = difference {
            println!("{}", d);
        }

        Ok(())
    }
}
