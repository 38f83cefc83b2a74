// SPDX-License-Identifier: MIT
//
// zhmotion: Vim word motions over mixed Chinese/Latin text.
//
// This binary wires the two crates together for use from a shell:
//
//   zm-segment → dictionary, segmenter, segmentation cache
//   zm-motion  → buffer view, motion engine, preview, options
//
// Commands:
//
//   segment [FILE]                         tokens of each line (stdin if no FILE)
//   motion FILE LINE:COL KEY [COUNT] [--op OP | --visual MODE --anchor LINE:COL]
//   preview FILE LINE:COL KEY [LIMIT]
//
// Positions are 1-indexed, like Vim's ruler. `--set` arguments that query an
// option (`ve?`, `pvl`, `all`) are echoed before the command's output.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use zm_motion::{
    Buffer, BufferView, Context, MotionEngine, MotionKind, MotionOptions, MotionRequest, MotionResult, Operator,
    Position, PreviewLimit, VisualKind,
};
use zm_segment::{CachedSegmenter, DEFAULT_DICT, LogFrequency, Segmenter, Token, Tokenize, build_dictionary};

// ─── Arguments ──────────────────────────────────────────────────────────────

/// Vim word motions over mixed Chinese/Latin text.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "zhmotion", version)]
struct Cli {
    /// Replace the bundled dictionary (`word [freq] [tag]` per line)
    #[arg(long, value_name = "PATH")]
    dict: Option<PathBuf>,

    /// Merge a user dictionary over the default one
    #[arg(long, value_name = "PATH")]
    user_dict: Option<PathBuf>,

    /// `:set` arguments, applied in order (e.g. "ve pvl=3", "all")
    #[arg(long, value_name = "OPTS")]
    set: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Print the tokens of each line
    Segment {
        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Compute where one motion lands
    Motion {
        file: PathBuf,
        #[arg(value_name = "LINE:COL")]
        pos: Position,
        /// One of w W e E b B ge gE
        key: MotionKind,
        #[arg(default_value_t = 1)]
        count: usize,
        /// Consume the motion as the target of an operator
        #[arg(long, value_enum, conflicts_with = "visual")]
        op: Option<OpArg>,
        /// Extend a visual selection of this kind
        #[arg(long, value_enum, requires = "anchor")]
        visual: Option<VisualArg>,
        /// Fixed end of the visual selection
        #[arg(long, value_name = "LINE:COL", requires = "visual")]
        anchor: Option<Position>,
    },
    /// List the landing spots of repeated presses
    Preview {
        file: PathBuf,
        #[arg(value_name = "LINE:COL")]
        pos: Position,
        key: MotionKind,
        /// Number of steps; the `previewlimit` option when omitted, 0 for the line
        limit: Option<usize>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OpArg {
    #[value(name = "d")]
    Delete,
    #[value(name = "c")]
    Change,
    #[value(name = "y")]
    Yank,
    #[value(name = ">")]
    Indent,
    #[value(name = "<")]
    Outdent,
    #[value(name = "=")]
    Reindent,
}

impl OpArg {
    const fn operator(self) -> Operator {
        Operator::from_key(match self {
            Self::Delete => 'd',
            Self::Change => 'c',
            Self::Yank => 'y',
            Self::Indent => '>',
            Self::Outdent => '<',
            Self::Reindent => '=',
        })
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum VisualArg {
    /// Characterwise
    #[value(name = "v")]
    Char,
    /// Linewise
    #[value(name = "V")]
    Line,
    /// Blockwise
    #[value(name = "b")]
    Block,
}

impl From<VisualArg> for VisualKind {
    fn from(arg: VisualArg) -> Self {
        match arg {
            VisualArg::Char => Self::Char,
            VisualArg::Line => Self::Line,
            VisualArg::Block => Self::Block,
        }
    }
}

/// The context a motion is consumed in. Clap keeps `--op` and `--visual`
/// apart and pairs `--visual` with `--anchor`.
fn motion_context(op: Option<OpArg>, visual: Option<VisualArg>, anchor: Option<Position>) -> Context {
    match (op, visual, anchor) {
        (Some(op), _, _) => Context::OperatorPending(op.operator()),
        (None, Some(kind), Some(anchor)) => Context::Visual {
            kind: kind.into(),
            anchor,
        },
        _ => Context::Normal,
    }
}

// ─── Output ─────────────────────────────────────────────────────────────────

fn format_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{tok}");
    }
    out
}

fn format_result(result: &MotionResult) -> String {
    let mut out = result.pos.to_string();
    for (flag, on) in [
        ("inclusive", result.inclusive),
        ("clamped", result.clamped),
        ("linewise", result.linewise),
        ("abort", result.abort),
    ] {
        if on {
            out.push(' ');
            out.push_str(flag);
        }
    }
    if let Some(span) = result.span {
        let _ = write!(out, " span={span}");
    }
    out
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("{}", path.display()))
}

fn load_buffer(path: &Path) -> Result<Buffer> {
    Buffer::from_file(path).with_context(|| format!("{}", path.display()))
}

fn build_tokenizer(cli: &Cli, options: &MotionOptions) -> Result<CachedSegmenter> {
    let default_source = match &cli.dict {
        Some(path) => read_source(path)?,
        None => DEFAULT_DICT.to_string(),
    };
    let user_source = cli.user_dict.as_deref().map(read_source).transpose()?;
    let dict = build_dictionary(&default_source, user_source.as_deref())?;
    let segmenter = Segmenter::with_scorer(Arc::new(dict), LogFrequency::new(options.unknown_freq));
    Ok(CachedSegmenter::new(segmenter, options.cache_size))
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let mut options = MotionOptions::default();
    for line in options.apply_set(&cli.set.join(" ")).context("--set")? {
        writeln!(out, "{line}")?;
    }
    let engine = MotionEngine::new(build_tokenizer(cli, &options)?, options);

    match &cli.command {
        Command::Segment { file } => {
            let text = match file {
                Some(path) => read_source(path)?,
                None => io::read_to_string(io::stdin()).context("stdin")?,
            };
            let buffer = Buffer::from_text(&text);
            for idx in 0..buffer.line_count() {
                let line = buffer.line(idx).unwrap_or_default();
                writeln!(out, "{}", format_tokens(&engine.tokenizer().tokenize(&line)))?;
            }
        }
        Command::Motion {
            file,
            pos,
            key,
            count,
            op,
            visual,
            anchor,
        } => {
            let buffer = load_buffer(file)?;
            let request = MotionRequest::new(*key, *pos)
                .count(*count)
                .context(motion_context(*op, *visual, *anchor));
            let result = engine.compute(&buffer, &request)?;
            writeln!(out, "{}", format_result(&result))?;
        }
        Command::Preview { file, pos, key, limit } => {
            let buffer = load_buffer(file)?;
            let limit = PreviewLimit::from_option(limit.unwrap_or(engine.options().preview_limit));
            let preview = engine.preview(&buffer, *pos, *key, limit)?;
            writeln!(out, "{preview}")?;
        }
    }

    let stats = engine.tokenizer().cache().stats();
    tracing::debug!(hits = stats.hits, misses = stats.misses, lines = stats.len, "segmentation cache");
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli, &mut io::stdout().lock()) {
        eprintln!("zhmotion: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use std::env;
    use zm_motion::Range;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("zhmotion").chain(args.iter().copied()))
    }

    fn cli(args: &[&str]) -> Cli {
        parse(args).unwrap()
    }

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn temp_file(name: &str, text: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("zhmotion-{}-{name}", process::id()));
        fs::write(&path, text).unwrap();
        path
    }

    fn run_to_string(cli: &Cli) -> String {
        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ── arguments ─────────────────────────────────────────────────────────

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_segment_defaults() {
        assert_eq!(
            cli(&["segment"]),
            Cli {
                dict: None,
                user_dict: None,
                set: Vec::new(),
                command: Command::Segment { file: None },
            }
        );
    }

    #[test]
    fn parse_motion_with_operator() {
        let cli = cli(&["--set", "ve", "motion", "a.txt", "2:3", "ge", "4", "--op", "d"]);
        assert_eq!(cli.set, vec!["ve".to_string()]);
        assert_eq!(
            cli.command,
            Command::Motion {
                file: PathBuf::from("a.txt"),
                pos: p(1, 2),
                key: MotionKind::Ge,
                count: 4,
                op: Some(OpArg::Delete),
                visual: None,
                anchor: None,
            }
        );
        assert_eq!(
            motion_context(Some(OpArg::Delete), None, None),
            Context::OperatorPending(Operator::Delete)
        );
    }

    #[test]
    fn parse_visual_block() {
        let Command::Motion {
            count,
            op,
            visual,
            anchor,
            ..
        } = cli(&["motion", "a.txt", "1:1", "W", "--visual", "b", "--anchor", "1:2"]).command
        else {
            panic!("expected motion");
        };
        assert_eq!(count, 1);
        assert_eq!(
            motion_context(op, visual, anchor),
            Context::Visual {
                kind: VisualKind::Block,
                anchor: p(0, 1),
            }
        );
    }

    #[test]
    fn operator_keys_map_to_operators() {
        assert_eq!(OpArg::Yank.operator(), Operator::Yank);
        assert_eq!(OpArg::Indent.operator(), Operator::from_key('>'));
        let Command::Motion { op, .. } = cli(&["motion", "a.txt", "1:1", "w", "--op", "<"]).command else {
            panic!("expected motion");
        };
        assert_eq!(op, Some(OpArg::Outdent));
        assert_eq!(motion_context(None, None, None), Context::Normal);
    }

    #[test]
    fn parse_set_flags_accumulate() {
        let cli = cli(&["--set", "ve", "--set", "pvl=2", "preview", "a.txt", "1:1", "w"]);
        assert_eq!(cli.set, vec!["ve".to_string(), "pvl=2".to_string()]);
        assert!(matches!(cli.command, Command::Preview { limit: None, .. }));
    }

    #[test]
    fn parse_errors() {
        let cases: [&[&str]; 11] = [
            &[],
            &["jump", "a.txt", "1:1", "w"],
            &["motion", "a.txt", "0:1", "w"],
            &["motion", "a.txt", "1:1", "x"],
            &["motion", "a.txt", "1:1", "w", "two"],
            &["motion", "a.txt", "1:1", "w", "--op", "dd"],
            &["motion", "a.txt", "1:1", "w", "--visual", "q", "--anchor", "1:1"],
            &["motion", "a.txt", "1:1", "w", "--visual", "v"],
            &["motion", "a.txt", "1:1", "w", "--anchor", "1:1"],
            &["motion", "a.txt", "1:1", "w", "--op", "d", "--visual", "v", "--anchor", "1:1"],
            &["--dict"],
        ];
        for args in cases {
            assert!(parse(args).is_err(), "{args:?}");
        }
    }

    // ── formatting ────────────────────────────────────────────────────────

    #[test]
    fn result_lists_set_flags_only() {
        let result = MotionResult {
            pos: p(0, 4),
            inclusive: true,
            clamped: false,
            linewise: false,
            abort: false,
            span: Some(Range::ordered(p(0, 0), p(0, 5))),
        };
        assert_eq!(format_result(&result), format!("1:5 inclusive span={}", Range::ordered(p(0, 0), p(0, 5))));
    }

    // ── run ───────────────────────────────────────────────────────────────

    #[test]
    fn segment_file() {
        let file = temp_file("segment.txt", "我爱北京天安门\nhello北京world\n");
        let path = file.display().to_string();
        let out = run_to_string(&cli(&["segment", &path]));
        let _ = fs::remove_file(file);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("我/"));
        assert!(lines[1].starts_with("hello/"));
    }

    #[test]
    fn motion_file() {
        let file = temp_file("motion.txt", "我爱北京天安门\n");
        let path = file.display().to_string();
        let out = run_to_string(&cli(&["motion", &path, "1:1", "w", "3"]));
        let _ = fs::remove_file(file);
        assert_eq!(out, "1:5\n");
    }

    #[test]
    fn set_queries_are_echoed_before_output() {
        let file = temp_file("echo.txt", "我爱北京天安门\n");
        let path = file.display().to_string();
        let out = run_to_string(&cli(&["--set", "ve? pvl=2", "--set", "pvl", "preview", &path, "1:1", "w"]));
        let _ = fs::remove_file(file);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "novirtualedit");
        assert_eq!(lines[1], "previewlimit=2");
        assert_eq!(lines[2], "w from 1:1: 1=1:2 [2] 2=1:3 [4]");
    }

    #[test]
    fn user_dict_changes_segmentation() {
        let dict = temp_file("user.dict", "天安门广场\n");
        let file = temp_file("user.txt", "天安门广场\n");
        let (dict_path, path) = (dict.display().to_string(), file.display().to_string());
        let out = run_to_string(&cli(&["--user-dict", &dict_path, "segment", &path]));
        let _ = fs::remove_file(dict);
        let _ = fs::remove_file(file);
        assert_eq!(out.trim_end().split(' ').count(), 1);
    }

    #[test]
    fn bad_option_is_an_error() {
        let mut out = Vec::new();
        assert!(run(&cli(&["--set", "bogus", "segment"]), &mut out).is_err());
    }
}
